// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod catalog;
mod config;
mod logging;
mod render;
mod script;

use anyhow::{Context, Result, bail};
use catalog::Catalog;
use clap::{ArgAction, Parser};
use config::Config;
use datatable_app::{
    Group, Navigator, Record, TableEvent, TableInput, TableViewModel, route_navigation,
};
use datatable_testkit::ApplicationFaker;
use script::ScriptStep;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const DEMO_MAX_GROUPS: usize = 4;
const DEMO_MAX_ROWS: usize = 8;

#[derive(Parser, Debug)]
#[command(name = "datatable")]
#[command(about = "Replay table interactions over grouped records and print the result")]
#[command(version)]
struct Args {
    /// Config file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON file holding an array of groups (or records with --flat)
    #[arg(long, value_name = "FILE", conflicts_with = "demo")]
    data: Option<PathBuf>,

    /// Use generated application rounds instead of a data file
    #[arg(long)]
    demo: bool,

    /// Seed for --demo data
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Interaction script, one command per line
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Treat the input as one ungrouped list
    #[arg(long)]
    flat: bool,

    /// Raise log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print resolved config path
    #[arg(long)]
    print_config_path: bool,

    /// Print a config template
    #[arg(long)]
    print_example_config: bool,

    /// Validate config, data and script, then exit
    #[arg(long)]
    check: bool,
}

fn main() {
    if let Err(error) = run(Args::parse()) {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };

    if args.print_config_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if args.print_example_config {
        print!("{}", Config::example_config(&config_path));
        return Ok(());
    }

    let config = Config::load(&config_path).with_context(|| {
        format!(
            "load config {}; run `datatable --print-example-config` to generate a template",
            config_path.display()
        )
    })?;
    logging::init(logging::raise(config.log_level()?, args.verbose));

    let cells = config.cell_config()?;
    let grouped = config.grouping() && !args.flat;
    let input = match (&args.data, args.demo) {
        (Some(path), _) => load_input(path, grouped)?,
        (None, true) => demo_input(args.seed, grouped),
        (None, false) => bail!("no records to show; pass --data FILE or --demo"),
    };
    let steps = match &args.script {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("read script {}", path.display()))?;
            script::parse_script(&source)
                .with_context(|| format!("parse script {}", path.display()))?
        }
        None => Vec::new(),
    };
    if args.check {
        return Ok(());
    }

    let mut model = TableViewModel::new(input, cells)
        .with_features(config.features())
        .with_filter_config(config.filter_definitions());
    replay(&mut model, &steps, &mut StdoutNavigator)?;
    tracing::info!(
        steps = steps.len(),
        rows = model.row_count(),
        "script replayed"
    );

    let catalog = Catalog::english().with_overrides(&config.labels);
    print!("{}", render::render(&model.view(), &catalog));
    Ok(())
}

struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn navigate(&mut self, target: &str) {
        println!("navigate: {target}");
    }
}

fn replay(
    model: &mut TableViewModel,
    steps: &[ScriptStep],
    navigator: &mut dyn Navigator,
) -> Result<()> {
    for step in steps {
        let events = model
            .dispatch(step.command.clone())
            .with_context(|| format!("script line {}", step.line))?;
        for event in &events {
            if let TableEvent::Ignored(reason) = event {
                tracing::info!(line = step.line, reason = %reason.message(), "command ignored");
            }
        }
        route_navigation(&events, navigator);
    }
    Ok(())
}

fn load_input(path: &Path, grouped: bool) -> Result<TableInput> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("read data file {}", path.display()))?;
    let items: Vec<Value> = serde_json::from_str(&raw)
        .with_context(|| format!("decode data file {} as a JSON array", path.display()))?;
    let holds_groups = items.iter().all(|item| item.get("applications").is_some());

    if !holds_groups {
        if grouped {
            bail!(
                "decode groups from {}; expected [{{\"id\": .., \"applications\": [..]}}] or pass --flat",
                path.display()
            );
        }
        let records = items.into_iter().map(Record::new).collect();
        return Ok(TableInput::Flat(records));
    }

    let groups: Vec<Group> = serde_json::from_value(Value::Array(items))
        .with_context(|| format!("decode groups from {}", path.display()))?;
    if grouped {
        Ok(TableInput::Grouped(groups))
    } else {
        Ok(TableInput::Flat(
            groups
                .into_iter()
                .flat_map(|group| group.applications)
                .collect(),
        ))
    }
}

fn demo_input(seed: u64, grouped: bool) -> TableInput {
    let mut faker = ApplicationFaker::new(seed);
    let groups = faker.grouped(DEMO_MAX_GROUPS, DEMO_MAX_ROWS);
    tracing::debug!(seed = faker.seed(), groups = groups.len(), "generated demo data");
    if grouped {
        TableInput::Grouped(groups)
    } else {
        TableInput::Flat(
            groups
                .into_iter()
                .flat_map(|group| group.applications)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Args, demo_input, load_input, replay};
    use crate::config::Config;
    use crate::script::parse_script;
    use anyhow::Result;
    use clap::Parser;
    use datatable_app::{Navigator, TableInput, TableViewModel};
    use datatable_testkit::{ApplicationFaker, write_groups_json};
    use std::path::PathBuf;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Navigator for Recorder {
        fn navigate(&mut self, target: &str) {
            self.0.push(target.to_owned());
        }
    }

    #[test]
    fn args_parse_flags() -> Result<()> {
        let args = Args::try_parse_from([
            "datatable",
            "--config",
            "/tmp/datatable.toml",
            "--demo",
            "--seed",
            "7",
            "--flat",
            "-vv",
            "--check",
        ])?;
        assert_eq!(args.config, Some(PathBuf::from("/tmp/datatable.toml")));
        assert!(args.demo);
        assert_eq!(args.seed, 7);
        assert!(args.flat);
        assert_eq!(args.verbose, 2);
        assert!(args.check);
        assert!(!args.print_config_path);
        Ok(())
    }

    #[test]
    fn data_and_demo_conflict() {
        let error = Args::try_parse_from(["datatable", "--data", "groups.json", "--demo"])
            .expect_err("conflicting sources should fail");
        assert!(error.to_string().contains("--demo"));
    }

    #[test]
    fn load_input_reads_groups_or_flattens() -> Result<()> {
        let groups = ApplicationFaker::new(4).grouped(3, 5);
        let rows: usize = groups.iter().map(|group| group.applications.len()).sum();
        let (_dir, path) = write_groups_json(&groups)?;

        match load_input(&path, true)? {
            TableInput::Grouped(loaded) => assert_eq!(loaded, groups),
            TableInput::Flat(_) => panic!("expected grouped input"),
        }
        match load_input(&path, false)? {
            TableInput::Flat(records) => assert_eq!(records.len(), rows),
            TableInput::Grouped(_) => panic!("expected flat input"),
        }
        Ok(())
    }

    #[test]
    fn load_input_accepts_plain_records_when_flat() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("records.json");
        std::fs::write(&path, r#"[{"id": 1, "status": "validated"}, {"id": 2}]"#)?;

        match load_input(&path, false)? {
            TableInput::Flat(records) => assert_eq!(records.len(), 2),
            TableInput::Grouped(_) => panic!("expected flat input"),
        }
        let error = load_input(&path, true).expect_err("records are not groups");
        assert!(error.to_string().contains("decode groups"));
        Ok(())
    }

    #[test]
    fn replay_routes_navigation_and_tolerates_ignored_commands() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        let input = demo_input(3, true);
        let first_id = match &input {
            TableInput::Grouped(groups) => groups
                .iter()
                .flat_map(|group| group.applications.iter())
                .find_map(|record| record.id_at("id")),
            TableInput::Flat(_) => None,
        };
        let Some(first_id) = first_id else {
            return Ok(());
        };

        let mut model = TableViewModel::new(input, config.cell_config()?)
            .with_features(config.features())
            .with_filter_config(config.filter_definitions());
        // No filter definitions in the default config, so filter-controls is ignored.
        let steps = parse_script(&format!("filter-controls\nsort status\nclick {first_id}\n"))?;
        let mut recorder = Recorder::default();
        replay(&mut model, &steps, &mut recorder)?;

        assert_eq!(recorder.0, vec![format!("/application/{first_id}")]);
        assert_eq!(model.row_count(), model.row_ids(None)?.len());
        assert_eq!(model.sort().key, "status");
        assert!(!model.filter_controls_open());
        Ok(())
    }

    #[test]
    fn replay_selection_script_clicks_toggle_membership() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        let mut model = TableViewModel::new(demo_input(5, false), config.cell_config()?)
            .with_features(config.features());
        let ids = model.row_ids(None)?;
        let Some(first) = ids.first() else {
            return Ok(());
        };

        let steps = parse_script(&format!("selection\nclick {first}\nselect-all on\n"))?;
        let mut recorder = Recorder::default();
        replay(&mut model, &steps, &mut recorder)?;

        assert!(recorder.0.is_empty());
        assert!(model.all_rows_selected());
        Ok(())
    }
}
