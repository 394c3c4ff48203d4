// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fmt;
use std::sync::Arc;

use crate::{Record, SortDirection, SortState};

/// Toolbar features enabled for one table instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableFeatures {
    pub filtering: bool,
    pub row_filters: bool,
    pub hide_handled: bool,
    pub selection: bool,
}

impl TableFeatures {
    pub const fn all() -> Self {
        Self {
            filtering: true,
            row_filters: true,
            hide_handled: true,
            selection: true,
        }
    }
}

/// What a cell shows: literal text, or a label key for the translation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    Text(String),
    Label(String),
}

#[derive(Clone)]
pub enum CellTransform {
    /// `"{prefix}.{value}"` looked up as a label.
    Label { prefix: String },
    /// Text with `{path}` placeholders filled from the record.
    Template { template: String },
    Custom(Arc<dyn Fn(&Record) -> CellContent + Send + Sync>),
}

impl CellTransform {
    pub fn custom(transform: impl Fn(&Record) -> CellContent + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(transform))
    }

    pub fn apply(&self, record: &Record, key: &str) -> CellContent {
        match self {
            Self::Label { prefix } => {
                let value = record.resolve(key);
                if value.is_absent() {
                    CellContent::Text(String::new())
                } else {
                    CellContent::Label(format!("{prefix}.{}", value.display()))
                }
            }
            Self::Template { template } => CellContent::Text(fill_template(template, record)),
            Self::Custom(transform) => transform(record),
        }
    }
}

impl fmt::Debug for CellTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label { prefix } => f.debug_struct("Label").field("prefix", prefix).finish(),
            Self::Template { template } => f
                .debug_struct("Template")
                .field("template", template)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    /// Label key for the header.
    pub title: String,
    /// Dotted path used for sorting and the default cell value.
    pub key: String,
    pub transform: Option<CellTransform>,
}

impl Column {
    pub fn new(title: &str, key: &str) -> Self {
        Self {
            title: title.to_owned(),
            key: key.to_owned(),
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: CellTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn content(&self, record: &Record) -> CellContent {
        match &self.transform {
            Some(transform) => transform.apply(record, &self.key),
            None => CellContent::Text(record.resolve(&self.key).display()),
        }
    }
}

#[derive(Clone)]
pub enum RowLink {
    Template(String),
    Custom(Arc<dyn Fn(&Record) -> String + Send + Sync>),
}

impl RowLink {
    pub fn target(&self, record: &Record) -> String {
        match self {
            Self::Template(template) => fill_template(template, record),
            Self::Custom(link) => link(record),
        }
    }
}

impl fmt::Debug for RowLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CellConfig {
    pub cols: Vec<Column>,
    /// Dotted path of the unique integer id on every record.
    pub index: String,
    pub sorting: String,
    pub order: SortDirection,
    pub row_link: Option<RowLink>,
}

impl CellConfig {
    pub fn initial_sort(&self) -> SortState {
        SortState::new(&self.sorting, self.order)
    }
}

/// A filter control definition. Only the filter-control collaborator reads
/// its contents; the table itself only cares whether any exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDefinition {
    pub title: String,
    pub key: String,
    pub values: Vec<String>,
}

/// Replaces each `{path}` with the displayed value at that path. An unclosed
/// brace is copied through literally.
pub fn fill_template(template: &str, record: &Record) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                out.push_str(&record.resolve(&after[..end]).display());
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::{CellContent, CellTransform, Column, RowLink, fill_template};
    use crate::Record;
    use serde_json::json;

    fn record() -> Record {
        Record::new(json!({
            "id": 12,
            "status": "in_review",
            "applicant": {"name": "Kim"},
        }))
    }

    #[test]
    fn template_fills_placeholders_and_keeps_unclosed_braces() {
        assert_eq!(
            fill_template("/application/{id}/details", &record()),
            "/application/12/details"
        );
        assert_eq!(fill_template("{applicant.name} ({missing})", &record()), "Kim ()");
        assert_eq!(fill_template("broken {id", &record()), "broken {id");
    }

    #[test]
    fn column_content_defaults_to_field_text() {
        let column = Column::new("Application.headings.applicant", "applicant.name");
        assert_eq!(column.content(&record()), CellContent::Text("Kim".to_owned()));
    }

    #[test]
    fn label_transform_builds_prefixed_key() {
        let column = Column::new("Application.headings.status", "status").with_transform(
            CellTransform::Label {
                prefix: "Application.statuses".to_owned(),
            },
        );
        assert_eq!(
            column.content(&record()),
            CellContent::Label("Application.statuses.in_review".to_owned())
        );

        let missing = Column::new("x", "nope").with_transform(CellTransform::Label {
            prefix: "p".to_owned(),
        });
        assert_eq!(missing.content(&record()), CellContent::Text(String::new()));
    }

    #[test]
    fn custom_transforms_and_links_run_closures() {
        let column = Column::new("t", "id").with_transform(CellTransform::custom(|record| {
            CellContent::Text(format!("#{}", record.resolve("id").display()))
        }));
        assert_eq!(column.content(&record()), CellContent::Text("#12".to_owned()));

        let link = RowLink::Custom(std::sync::Arc::new(|record: &Record| {
            format!("/r/{}", record.resolve("id").display())
        }));
        assert_eq!(link.target(&record()), "/r/12");
    }
}
