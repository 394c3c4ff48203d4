// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Plain-text rendering of a [`TableView`].

use datatable_app::{
    Affordance, Body, CellContent, Checkbox, GroupView, Header, SortDirection, TableView, Toolbar,
    Translator,
};
use std::fmt::Write as _;

const COLUMN_SEPARATOR: &str = " | ";

pub fn render(view: &TableView, translator: &dyn Translator) -> String {
    let mut out = String::new();
    if let Some(toolbar) = &view.toolbar {
        let line = toolbar_line(toolbar, translator);
        if !line.is_empty() {
            let _ = writeln!(out, "{line}");
        }
    }
    let _ = writeln!(out, "{}", header_line(&view.header, translator));

    match &view.body {
        Body::Empty { label, .. } => {
            let _ = writeln!(out, "  {}", label.resolve(translator));
        }
        Body::Groups(groups) => {
            for group in groups {
                render_group(&mut out, group, translator);
            }
        }
    }
    out
}

fn toolbar_line(toolbar: &Toolbar, translator: &dyn Translator) -> String {
    let mut buttons: Vec<String> = [
        &toolbar.filter,
        &toolbar.hide_handled,
        &toolbar.selection,
        &toolbar.group_visibility,
    ]
    .into_iter()
    .flatten()
    .map(|affordance| button(affordance, translator))
    .collect();
    if toolbar.filter_controls_open {
        buttons.push("(filter controls open)".to_owned());
    }
    buttons.join(" ")
}

fn button(affordance: &Affordance, translator: &dyn Translator) -> String {
    let mut text = format!("[{}]", affordance.label.resolve(translator));
    if affordance.active {
        text.push('*');
    }
    if !affordance.enabled {
        text.push_str("(disabled)");
    }
    text
}

fn header_line(header: &Header, translator: &dyn Translator) -> String {
    let mut cells: Vec<String> = header
        .select_all
        .iter()
        .map(|checkbox| checkbox_mark(checkbox).to_owned())
        .collect();
    cells.extend(header.columns.iter().map(|column| {
        let title = column.title.resolve(translator);
        match column.sort_indicator {
            Some(SortDirection::Asc) => format!("{title} ^"),
            Some(SortDirection::Desc) => format!("{title} v"),
            None => title,
        }
    }));
    cells.join(COLUMN_SEPARATOR)
}

fn render_group(out: &mut String, group: &GroupView, translator: &dyn Translator) {
    if group.collapsible {
        let marker = if group.visible { "v" } else { ">" };
        let mut heading = format!("{marker} group {}", group.index + 1);
        if let Some(id) = group.id {
            let _ = write!(heading, " #{id}");
        }
        if let Some(name) = group.metadata.get("name").and_then(|name| name.as_str()) {
            let _ = write!(heading, " {name}");
        }
        let _ = write!(heading, " ({} rows)", group.rows.len());
        if let Some(selected) = group.selected {
            heading.push(' ');
            heading.push_str(if selected { "[x]" } else { "[ ]" });
        }
        let _ = writeln!(out, "{heading}");
    }
    if !group.visible {
        return;
    }

    for row in &group.rows {
        let mut cells: Vec<String> = row
            .select
            .iter()
            .map(|checkbox| checkbox_mark(checkbox).to_owned())
            .collect();
        cells.extend(row.cells.iter().map(|cell| match cell {
            CellContent::Text(text) => text.clone(),
            CellContent::Label(key) => translator.translate(key, &[]),
        }));
        let _ = writeln!(out, "  {}", cells.join(COLUMN_SEPARATOR));
    }
}

fn checkbox_mark(checkbox: &Checkbox) -> &'static str {
    if checkbox.checked { "[x]" } else { "[ ]" }
}
