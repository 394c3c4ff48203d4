// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use datatable_app::{
    CellConfig, CellTransform, Column, FilterDefinition, RowLink, SortDirection, TableFeatures,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::Level;

pub const APP_NAME: &str = "datatable";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_INDEX: &str = "id";
const DEFAULT_SORTING: &str = "id";
const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_ROW_LINK: &str = "/application/{id}";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub table: Table,
    #[serde(default)]
    pub features: Features,
    #[serde(default)]
    pub columns: Vec<ColumnEntry>,
    #[serde(default)]
    pub filters: Vec<FilterEntry>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            table: Table::default(),
            features: Features::default(),
            columns: Vec::new(),
            filters: Vec::new(),
            labels: BTreeMap::new(),
            logging: Logging::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Table {
    pub grouping: Option<bool>,
    pub index: Option<String>,
    pub sorting: Option<String>,
    pub order: Option<String>,
    pub row_link: Option<String>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            grouping: Some(true),
            index: Some(DEFAULT_INDEX.to_owned()),
            sorting: Some(DEFAULT_SORTING.to_owned()),
            order: Some(SortDirection::Asc.as_str().to_owned()),
            row_link: Some(DEFAULT_ROW_LINK.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Features {
    pub filtering: Option<bool>,
    pub row_filters: Option<bool>,
    pub hide_handled: Option<bool>,
    pub selection: Option<bool>,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            filtering: Some(true),
            row_filters: Some(true),
            hide_handled: Some(true),
            selection: Some(true),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnEntry {
    pub title: String,
    pub key: String,
    pub label_prefix: Option<String>,
    pub template: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterEntry {
    pub title: String,
    pub key: String,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    pub level: Option<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("DATATABLE_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!(
                "cannot resolve config directory; set DATATABLE_CONFIG_PATH to the config file"
            )
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` at the top",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(index) = &self.table.index
            && index.trim().is_empty()
        {
            bail!("table.index in {} must name a record path", path.display());
        }

        if let Some(order) = &self.table.order
            && SortDirection::parse(order).is_none()
        {
            bail!(
                "table.order in {} must be \"asc\" or \"desc\", got {order:?}",
                path.display()
            );
        }

        for (position, column) in self.columns.iter().enumerate() {
            if column.key.trim().is_empty() {
                bail!(
                    "columns[{position}] in {} has an empty key",
                    path.display()
                );
            }
            if column.label_prefix.is_some() && column.template.is_some() {
                bail!(
                    "columns[{position}] ({}) in {} sets both label_prefix and template; pick one",
                    column.key,
                    path.display()
                );
            }
        }

        self.log_level()
            .with_context(|| format!("invalid [logging] in {}", path.display()))?;
        Ok(())
    }

    pub fn grouping(&self) -> bool {
        self.table.grouping.unwrap_or(true)
    }

    pub fn features(&self) -> TableFeatures {
        let defaults = Features::default();
        let flag = |value: Option<bool>, fallback: Option<bool>| {
            value.or(fallback).unwrap_or(false)
        };
        TableFeatures {
            filtering: flag(self.features.filtering, defaults.filtering),
            row_filters: flag(self.features.row_filters, defaults.row_filters),
            hide_handled: flag(self.features.hide_handled, defaults.hide_handled),
            selection: flag(self.features.selection, defaults.selection),
        }
    }

    pub fn cell_config(&self) -> Result<CellConfig> {
        let order = self.table.order.as_deref().unwrap_or("asc");
        let order = SortDirection::parse(order)
            .ok_or_else(|| anyhow!("table.order must be \"asc\" or \"desc\", got {order:?}"))?;

        Ok(CellConfig {
            cols: self.columns(),
            index: self
                .table
                .index
                .clone()
                .unwrap_or_else(|| DEFAULT_INDEX.to_owned()),
            sorting: self
                .table
                .sorting
                .clone()
                .unwrap_or_else(|| DEFAULT_SORTING.to_owned()),
            order,
            // An explicit empty string turns navigation off.
            row_link: Some(self.table.row_link.as_deref().unwrap_or(DEFAULT_ROW_LINK))
                .filter(|link| !link.is_empty())
                .map(|link| RowLink::Template(link.to_owned())),
        })
    }

    fn columns(&self) -> Vec<Column> {
        if self.columns.is_empty() {
            return default_columns();
        }
        self.columns
            .iter()
            .map(|entry| {
                let column = Column::new(&entry.title, &entry.key);
                match (&entry.label_prefix, &entry.template) {
                    (Some(prefix), _) => column.with_transform(CellTransform::Label {
                        prefix: prefix.clone(),
                    }),
                    (None, Some(template)) => column.with_transform(CellTransform::Template {
                        template: template.clone(),
                    }),
                    (None, None) => column,
                }
            })
            .collect()
    }

    pub fn filter_definitions(&self) -> Vec<FilterDefinition> {
        self.filters
            .iter()
            .map(|entry| FilterDefinition {
                title: entry.title.clone(),
                key: entry.key.clone(),
                values: entry.values.clone(),
            })
            .collect()
    }

    pub fn log_level(&self) -> Result<Level> {
        let raw = self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
        Level::from_str(raw).map_err(|_| {
            anyhow!("unknown log level {raw:?}; use one of: error, warn, info, debug, trace")
        })
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# datatable config\n# Place this file at: {}\n\nversion = 1\n\n[table]\ngrouping = true\nindex = \"id\"\nsorting = \"applicantName\"\norder = \"asc\"\nrow_link = \"/application/{{id}}\"\n\n[features]\nfiltering = true\nrow_filters = true\nhide_handled = true\nselection = true\n\n[[columns]]\ntitle = \"Applicant\"\nkey = \"applicantName\"\n\n[[columns]]\ntitle = \"Organisation\"\nkey = \"organisation.name\"\n\n[[columns]]\ntitle = \"Status\"\nkey = \"status\"\nlabel_prefix = \"Application.statuses\"\n\n[[filters]]\ntitle = \"Status\"\nkey = \"status\"\nvalues = [\"in_review\", \"review_done\", \"allocated\", \"validated\", \"handled\", \"declined\"]\n\n[labels]\n\"Application.statuses.validated\" = \"Validated\"\n\n[logging]\nlevel = \"{}\"\n",
            path.display(),
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn default_columns() -> Vec<Column> {
    vec![
        Column::new("ID", "id"),
        Column::new("Applicant", "applicantName"),
        Column::new("Organisation", "organisation.name"),
        Column::new("Status", "status"),
    ]
}

#[cfg(test)]
mod tests {
    use super::Config;
    use anyhow::Result;
    use datatable_app::{CellContent, Record, SortDirection};
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use tracing::Level;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert!(config.grouping());
        assert!(config.features().selection);
        assert_eq!(config.log_level()?, Level::WARN);

        let cells = config.cell_config()?;
        assert_eq!(cells.index, "id");
        assert_eq!(cells.order, SortDirection::Asc);
        assert_eq!(cells.cols.len(), 4);
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[table]\nindex = \"id\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        assert!(error.to_string().contains("version = 1"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn full_config_builds_table_settings() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[table]\ngrouping = false\nindex = \"meta.id\"\nsorting = \"name\"\norder = \"desc\"\nrow_link = \"\"\n[features]\nselection = false\n[[columns]]\ntitle = \"Status\"\nkey = \"status\"\nlabel_prefix = \"Application.statuses\"\n[[columns]]\ntitle = \"Where\"\nkey = \"city\"\ntemplate = \"{city} ({zip})\"\n[[filters]]\ntitle = \"Status\"\nkey = \"status\"\nvalues = [\"validated\"]\n[labels]\n\"common.filter\" = \"Rajaa\"\n[logging]\nlevel = \"debug\"\n",
        )?;
        let config = Config::load(&path)?;
        assert!(!config.grouping());
        let features = config.features();
        assert!(features.filtering);
        assert!(!features.selection);
        assert_eq!(config.log_level()?, Level::DEBUG);
        assert_eq!(config.labels.get("common.filter").map(String::as_str), Some("Rajaa"));
        assert_eq!(config.filter_definitions().len(), 1);

        let cells = config.cell_config()?;
        assert_eq!(cells.index, "meta.id");
        assert_eq!(cells.sorting, "name");
        assert_eq!(cells.order, SortDirection::Desc);
        assert!(cells.row_link.is_none());

        let record = Record::new(json!({"status": "validated", "city": "Oulu", "zip": 90100}));
        assert_eq!(
            cells.cols[0].content(&record),
            CellContent::Label("Application.statuses.validated".to_owned())
        );
        assert_eq!(
            cells.cols[1].content(&record),
            CellContent::Text("Oulu (90100)".to_owned())
        );
        Ok(())
    }

    #[test]
    fn partial_table_section_keeps_default_row_link() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[table]\norder = \"desc\"\n")?;
        let cells = Config::load(&path)?.cell_config()?;
        assert_eq!(cells.order, SortDirection::Desc);
        assert_eq!(cells.index, "id");
        let record = Record::new(json!({"id": 5}));
        let target = cells.row_link.map(|link| link.target(&record));
        assert_eq!(target.as_deref(), Some("/application/5"));
        Ok(())
    }

    #[test]
    fn unknown_order_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[table]\norder = \"sideways\"\n")?;
        let error = Config::load(&path).expect_err("unknown order should fail");
        assert!(error.to_string().contains("table.order"));
        Ok(())
    }

    #[test]
    fn empty_index_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[table]\nindex = \" \"\n")?;
        let error = Config::load(&path).expect_err("empty index should fail");
        assert!(error.to_string().contains("table.index"));
        Ok(())
    }

    #[test]
    fn column_with_two_transforms_is_rejected() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[[columns]]\ntitle = \"S\"\nkey = \"status\"\nlabel_prefix = \"a\"\ntemplate = \"{status}\"\n",
        )?;
        let error = Config::load(&path).expect_err("conflicting transforms should fail");
        assert!(error.to_string().contains("pick one"));
        Ok(())
    }

    #[test]
    fn unknown_log_level_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[logging]\nlevel = \"loud\"\n")?;
        let error = Config::load(&path).expect_err("unknown level should fail");
        assert!(format!("{error:#}").contains("unknown log level"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("DATATABLE_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("DATATABLE_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_config_toml_suffix_when_no_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("DATATABLE_CONFIG_PATH");
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("datatable/config.toml"));
        Ok(())
    }

    #[test]
    fn example_config_loads_cleanly() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, Config::example_config(&path))?;
        let config = Config::load(&path)?;
        assert_eq!(config.columns.len(), 3);
        assert_eq!(config.cell_config()?.sorting, "applicantName");
        Ok(())
    }
}
