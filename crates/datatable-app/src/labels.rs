// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::TableEvent;

/// User-facing strings the table asks the translation layer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKey {
    Filter,
    Filtered,
    FilterHideHandled,
    FilterShowHandled,
    ActivateSelection,
    DisableSelection,
    OpenAll,
    CloseAll,
    SelectAllRows,
    DeselectAllRows,
    SelectRowX,
    DeselectRowX,
    NoResults,
}

impl LabelKey {
    pub const ALL: [Self; 13] = [
        Self::Filter,
        Self::Filtered,
        Self::FilterHideHandled,
        Self::FilterShowHandled,
        Self::ActivateSelection,
        Self::DisableSelection,
        Self::OpenAll,
        Self::CloseAll,
        Self::SelectAllRows,
        Self::DeselectAllRows,
        Self::SelectRowX,
        Self::DeselectRowX,
        Self::NoResults,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filter => "common.filter",
            Self::Filtered => "common.filtered",
            Self::FilterHideHandled => "common.filterHideHandled",
            Self::FilterShowHandled => "common.filterShowHandled",
            Self::ActivateSelection => "common.activateSelection",
            Self::DisableSelection => "common.disableSelection",
            Self::OpenAll => "common.openAll",
            Self::CloseAll => "common.closeAll",
            Self::SelectAllRows => "common.selectAllRows",
            Self::DeselectAllRows => "common.deselectAllRows",
            Self::SelectRowX => "common.selectRowX",
            Self::DeselectRowX => "common.deselectRowX",
            Self::NoResults => "common.noResults",
        }
    }
}

/// A label key plus interpolation parameters, resolved by a [`Translator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRequest {
    pub key: String,
    pub params: Vec<(String, String)>,
}

impl LabelRequest {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_owned(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.push((name.to_owned(), value.to_string()));
        self
    }

    pub fn resolve(&self, translator: &dyn Translator) -> String {
        translator.translate(&self.key, &self.params)
    }
}

impl From<LabelKey> for LabelRequest {
    fn from(key: LabelKey) -> Self {
        Self::new(key.as_str())
    }
}

pub trait Translator {
    fn translate(&self, key: &str, params: &[(String, String)]) -> String;
}

pub trait Navigator {
    fn navigate(&mut self, target: &str);
}

/// Hands every navigation request in `events` to the router.
pub fn route_navigation(events: &[TableEvent], navigator: &mut dyn Navigator) {
    for event in events {
        if let TableEvent::NavigationRequested(target) = event {
            navigator.navigate(target);
        }
    }
}
