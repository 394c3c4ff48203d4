// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use datatable_app::{LabelKey, Translator};
use std::collections::BTreeMap;

/// In-memory label catalog with English defaults for the table's own keys.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<String, String>,
}

impl Catalog {
    pub fn english() -> Self {
        let entries = LabelKey::ALL
            .iter()
            .map(|key| (key.as_str().to_owned(), english_text(*key).to_owned()))
            .collect();
        Self { entries }
    }

    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        self.entries
            .extend(overrides.iter().map(|(key, text)| (key.clone(), text.clone())));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

const fn english_text(key: LabelKey) -> &'static str {
    match key {
        LabelKey::Filter => "Filter",
        LabelKey::Filtered => "Filtered",
        LabelKey::FilterHideHandled => "Hide handled",
        LabelKey::FilterShowHandled => "Show handled",
        LabelKey::ActivateSelection => "Select",
        LabelKey::DisableSelection => "Cancel selection",
        LabelKey::OpenAll => "Open all",
        LabelKey::CloseAll => "Close all",
        LabelKey::SelectAllRows => "Select all rows",
        LabelKey::DeselectAllRows => "Deselect all rows",
        LabelKey::SelectRowX => "Select row {{row}}",
        LabelKey::DeselectRowX => "Deselect row {{row}}",
        LabelKey::NoResults => "No results",
    }
}

impl Translator for Catalog {
    /// Unknown keys render as the key itself.
    fn translate(&self, key: &str, params: &[(String, String)]) -> String {
        let mut text = self.get(key).unwrap_or(key).to_owned();
        for (name, value) in params {
            text = text.replace(&format!("{{{{{name}}}}}"), value);
        }
        text
    }
}
