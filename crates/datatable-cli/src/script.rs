// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Line-oriented interaction scripts replayed through the view model.

use anyhow::{Context, Result, anyhow, bail};
use datatable_app::{FilterOption, GroupId, RecordId, TableCommand};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    pub line: usize,
    pub command: TableCommand,
}

pub fn parse_script(source: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for (offset, raw) in source.lines().enumerate() {
        let line = offset + 1;
        let text = raw.split('#').next().unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }
        let command =
            parse_line(text).with_context(|| format!("script line {line}: {text:?}"))?;
        steps.push(ScriptStep { line, command });
    }
    Ok(steps)
}

fn parse_line(text: &str) -> Result<TableCommand> {
    let mut words = text.split_whitespace();
    let verb = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let command = match (verb, args.as_slice()) {
        ("sort", [key]) => TableCommand::SortBy((*key).to_owned()),
        ("filter", pairs) if !pairs.is_empty() => TableCommand::ApplyFilters(
            pairs
                .iter()
                .map(|pair| parse_filter(pair))
                .collect::<Result<_>>()?,
        ),
        ("clear-filters", []) => TableCommand::ClearFilters,
        ("filter-controls", []) => TableCommand::ToggleFilterControls,
        ("hide-handled", []) => TableCommand::ToggleHideHandled,
        ("selection", []) => TableCommand::ToggleSelectionMode,
        ("toggle-all", []) => TableCommand::ToggleAllGroups,
        ("toggle-group", [index]) => TableCommand::ToggleGroup(
            index
                .parse()
                .with_context(|| format!("group index {index:?} is not a number"))?,
        ),
        ("select-all", [state]) => TableCommand::SelectAll(parse_switch(state)?),
        ("select-group", [group, state]) => TableCommand::SelectGroup {
            group: parse_group(group)?,
            checked: parse_switch(state)?,
        },
        ("select-row", [id, state]) => TableCommand::SelectRow {
            id: parse_record(id)?,
            checked: parse_switch(state)?,
        },
        ("click", [id]) => TableCommand::ClickRow(parse_record(id)?),
        _ => bail!("unknown command or wrong arguments; see `datatable --help`"),
    };
    Ok(command)
}

/// `KEY=VALUE`, where VALUE is JSON when it parses and a plain string
/// otherwise.
fn parse_filter(pair: &str) -> Result<FilterOption> {
    let (key, raw) = pair
        .split_once('=')
        .ok_or_else(|| anyhow!("filter {pair:?} must look like KEY=VALUE"))?;
    if key.is_empty() {
        bail!("filter {pair:?} has an empty key");
    }
    let value =
        serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
    Ok(FilterOption::new(key, value))
}

fn parse_switch(word: &str) -> Result<bool> {
    match word {
        "on" => Ok(true),
        "off" => Ok(false),
        other => bail!("expected on or off, got {other:?}"),
    }
}

fn parse_record(word: &str) -> Result<RecordId> {
    let id: i64 = word
        .parse()
        .with_context(|| format!("row id {word:?} is not an integer"))?;
    Ok(RecordId::new(id))
}

/// `-` addresses the implicit group of an ungrouped table.
fn parse_group(word: &str) -> Result<Option<GroupId>> {
    if word == "-" {
        return Ok(None);
    }
    let id: i64 = word
        .parse()
        .with_context(|| format!("group id {word:?} is not an integer"))?;
    Ok(Some(GroupId::new(id)))
}
