// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use crate::engine;
use crate::selection::{self, Selection, SelectionMode};
use crate::{
    CellConfig, FilterDefinition, FilterOption, Group, GroupId, GroupVisibility, Record, RecordId,
    Result, SortState, TableFeatures,
};

/// Raw input for one render cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum TableInput {
    Grouped(Vec<Group>),
    /// Grouping disabled; the records live in one implicit group.
    Flat(Vec<Record>),
}

impl TableInput {
    fn into_groups(self) -> (Vec<Group>, bool) {
        match self {
            Self::Grouped(groups) => (groups, true),
            Self::Flat(records) => (vec![Group::implicit(records)], false),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableCommand {
    SortBy(String),
    ApplyFilters(Vec<FilterOption>),
    ClearFilters,
    ToggleFilterControls,
    ToggleHideHandled,
    ToggleSelectionMode,
    /// The toolbar open/close-all button; needs `filtering` like every
    /// toolbar command.
    ToggleAllGroups,
    /// A group header click. Group headers are part of the body, so this
    /// only needs grouping.
    ToggleGroup(usize),
    SelectAll(bool),
    SelectGroup {
        group: Option<GroupId>,
        checked: bool,
    },
    SelectRow {
        id: RecordId,
        checked: bool,
    },
    ClickRow(RecordId),
    ReplaceInput(TableInput),
}

impl TableCommand {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SortBy(_) => "sort_by",
            Self::ApplyFilters(_) => "apply_filters",
            Self::ClearFilters => "clear_filters",
            Self::ToggleFilterControls => "toggle_filter_controls",
            Self::ToggleHideHandled => "toggle_hide_handled",
            Self::ToggleSelectionMode => "toggle_selection_mode",
            Self::ToggleAllGroups => "toggle_all_groups",
            Self::ToggleGroup(_) => "toggle_group",
            Self::SelectAll(_) => "select_all",
            Self::SelectGroup { .. } => "select_group",
            Self::SelectRow { .. } => "select_row",
            Self::ClickRow(_) => "click_row",
            Self::ReplaceInput(_) => "replace_input",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    SortUnavailable,
    FilteringDisabled,
    FilterControlsDisabled,
    HideHandledDisabled,
    HideHandledLocked,
    SelectionDisabled,
    SelectionInactive,
    GroupingDisabled,
    UnknownGroupIndex(usize),
    UnknownRow(RecordId),
    NoRowLink,
}

impl IgnoredReason {
    pub fn message(self) -> String {
        match self {
            Self::SortUnavailable => "sort unavailable".to_owned(),
            Self::FilteringDisabled => "filtering disabled".to_owned(),
            Self::FilterControlsDisabled => "filter controls unavailable".to_owned(),
            Self::HideHandledDisabled => "hide handled disabled".to_owned(),
            Self::HideHandledLocked => "hide handled locked during selection".to_owned(),
            Self::SelectionDisabled => "selection disabled".to_owned(),
            Self::SelectionInactive => "selection mode is off".to_owned(),
            Self::GroupingDisabled => "grouping disabled".to_owned(),
            Self::UnknownGroupIndex(index) => format!("no group at index {index}"),
            Self::UnknownRow(id) => format!("row {id} not in view"),
            Self::NoRowLink => "rows have no link".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    SortChanged(SortState),
    FiltersChanged(Vec<FilterOption>),
    FilterControlsToggled(bool),
    HandledVisibilityChanged { hidden: bool },
    SelectionModeChanged(bool),
    GroupVisibilityChanged(Vec<bool>),
    SelectionChanged(Vec<RecordId>),
    NavigationRequested(String),
    InputReplaced { groups: usize },
    Ignored(IgnoredReason),
}

/// Presentation state for one data table: sort, filters, hide-handled,
/// group visibility and selection, over caller-owned grouped records.
#[derive(Debug, Clone)]
pub struct TableViewModel {
    groups: Vec<Group>,
    has_grouping: bool,
    features: TableFeatures,
    cells: CellConfig,
    filter_config: Vec<FilterDefinition>,
    sort: SortState,
    filters: Vec<FilterOption>,
    filter_controls_open: bool,
    hide_handled: bool,
    visibility: GroupVisibility,
    selection: Selection,
}

impl TableViewModel {
    pub fn new(input: TableInput, cells: CellConfig) -> Self {
        let (groups, has_grouping) = input.into_groups();
        Self {
            visibility: GroupVisibility::all_shown(groups.len()),
            sort: cells.initial_sort(),
            groups,
            has_grouping,
            features: TableFeatures::default(),
            cells,
            filter_config: Vec::new(),
            filters: Vec::new(),
            filter_controls_open: false,
            hide_handled: false,
            selection: Selection::default(),
        }
    }

    pub fn with_features(mut self, features: TableFeatures) -> Self {
        self.features = features;
        self
    }

    pub fn with_filter_config(mut self, filter_config: Vec<FilterDefinition>) -> Self {
        self.filter_config = filter_config;
        self
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn has_grouping(&self) -> bool {
        self.has_grouping
    }

    pub fn features(&self) -> TableFeatures {
        self.features
    }

    pub fn cells(&self) -> &CellConfig {
        &self.cells
    }

    pub fn filter_config(&self) -> &[FilterDefinition] {
        &self.filter_config
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn filters(&self) -> &[FilterOption] {
        &self.filters
    }

    pub fn filter_controls_open(&self) -> bool {
        self.filter_controls_open
    }

    pub fn hides_handled(&self) -> bool {
        self.hide_handled
    }

    pub fn visibility(&self) -> &GroupVisibility {
        &self.visibility
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn derived(&self) -> Vec<Group> {
        engine::derive(&self.groups, &self.sort, &self.filters, self.hide_handled)
    }

    /// Rows left in the derived view across all groups.
    pub fn row_count(&self) -> usize {
        engine::derived_row_count(&self.derived())
    }

    /// Header clicks only do something while the derived view has groups.
    pub fn sorting_enabled(&self) -> bool {
        !self.derived().is_empty()
    }

    pub fn row_ids(&self, group: Option<GroupId>) -> Result<Vec<RecordId>> {
        selection::row_ids(&self.derived(), &self.cells.index, group)
    }

    pub fn all_rows_selected(&self) -> bool {
        let derived = self.derived();
        selection::row_ids(&derived, &self.cells.index, None)
            .map(|ids| self.selection.equals_set(&ids))
            .unwrap_or(false)
    }

    pub fn group_selected(&self, group: Option<GroupId>) -> Result<bool> {
        Ok(self.selection.covers(&self.row_ids(group)?))
    }

    pub fn dispatch(&mut self, command: TableCommand) -> Result<Vec<TableEvent>> {
        let name = command.name();
        let events = match command {
            TableCommand::SortBy(key) => self.sort_by(&key),
            TableCommand::ApplyFilters(filters) => self.apply_filters(filters),
            TableCommand::ClearFilters => self.apply_filters(Vec::new()),
            TableCommand::ToggleFilterControls => self.toggle_filter_controls(),
            TableCommand::ToggleHideHandled => self.toggle_hide_handled(),
            TableCommand::ToggleSelectionMode => self.toggle_selection_mode(),
            TableCommand::ToggleAllGroups => {
                if !self.features.filtering {
                    return Ok(ignored(IgnoredReason::FilteringDisabled));
                }
                if !self.has_grouping {
                    return Ok(ignored(IgnoredReason::GroupingDisabled));
                }
                self.visibility.toggle_all(false);
                vec![self.visibility_event()]
            }
            TableCommand::ToggleGroup(index) => {
                if !self.has_grouping {
                    return Ok(ignored(IgnoredReason::GroupingDisabled));
                }
                match self.visibility.toggle(index) {
                    Some(_) => vec![self.visibility_event()],
                    None => ignored(IgnoredReason::UnknownGroupIndex(index)),
                }
            }
            TableCommand::SelectAll(checked) => {
                if !self.selection.is_active() {
                    return Ok(ignored(IgnoredReason::SelectionInactive));
                }
                let ids = if checked { self.row_ids(None)? } else { Vec::new() };
                self.update_selection(&ids, None)
            }
            TableCommand::SelectGroup { group, checked } => {
                if !self.selection.is_active() {
                    return Ok(ignored(IgnoredReason::SelectionInactive));
                }
                let ids = self.row_ids(group).inspect_err(|error| {
                    tracing::warn!(%error, "group selection failed");
                })?;
                self.update_selection(&ids, Some(membership(checked)))
            }
            TableCommand::SelectRow { id, checked } => {
                if !self.selection.is_active() {
                    return Ok(ignored(IgnoredReason::SelectionInactive));
                }
                self.update_selection(&[id], Some(membership(checked)))
            }
            TableCommand::ClickRow(id) => self.click_row(id),
            TableCommand::ReplaceInput(input) => self.replace_input(input),
        };
        tracing::debug!(command = name, events = events.len(), "table command applied");
        Ok(events)
    }

    fn sort_by(&mut self, key: &str) -> Vec<TableEvent> {
        if !self.sorting_enabled() {
            return ignored(IgnoredReason::SortUnavailable);
        }
        self.sort.toggle(key);
        vec![TableEvent::SortChanged(self.sort.clone())]
    }

    fn apply_filters(&mut self, filters: Vec<FilterOption>) -> Vec<TableEvent> {
        if !(self.features.filtering && self.features.row_filters) {
            return ignored(IgnoredReason::FilteringDisabled);
        }
        if self.filters == filters {
            return Vec::new();
        }
        self.filters = filters;
        vec![TableEvent::FiltersChanged(self.filters.clone())]
    }

    fn toggle_filter_controls(&mut self) -> Vec<TableEvent> {
        if !(self.features.filtering && self.features.row_filters) {
            return ignored(IgnoredReason::FilteringDisabled);
        }
        if !self.filter_controls_enabled() {
            return ignored(IgnoredReason::FilterControlsDisabled);
        }
        self.filter_controls_open = !self.filter_controls_open;
        vec![TableEvent::FilterControlsToggled(self.filter_controls_open)]
    }

    pub(crate) fn filter_controls_enabled(&self) -> bool {
        !self.filter_config.is_empty() && !self.selection.is_active()
    }

    fn toggle_hide_handled(&mut self) -> Vec<TableEvent> {
        if !(self.features.filtering && self.features.hide_handled) {
            return ignored(IgnoredReason::HideHandledDisabled);
        }
        if self.selection.is_active() {
            return ignored(IgnoredReason::HideHandledLocked);
        }
        self.hide_handled = !self.hide_handled;
        vec![TableEvent::HandledVisibilityChanged {
            hidden: self.hide_handled,
        }]
    }

    fn toggle_selection_mode(&mut self) -> Vec<TableEvent> {
        if !(self.features.filtering && self.features.selection) {
            return ignored(IgnoredReason::SelectionDisabled);
        }
        let mut events = Vec::new();
        if self.selection.is_active() {
            self.selection.set_active(false);
            if self.selection.clear() {
                events.push(TableEvent::SelectionChanged(Vec::new()));
            }
            events.push(TableEvent::SelectionModeChanged(false));
        } else {
            events.extend(self.open_all_for_selection());
            self.selection.set_active(true);
            events.push(TableEvent::SelectionModeChanged(true));
        }
        events
    }

    /// Entering selection mode opens every group so the whole set of
    /// selectable rows is on screen.
    fn open_all_for_selection(&mut self) -> Option<TableEvent> {
        let before = self.visibility.clone();
        self.visibility.toggle_all(true);
        (before != self.visibility).then(|| self.visibility_event())
    }

    fn click_row(&mut self, id: RecordId) -> Vec<TableEvent> {
        let derived = self.derived();
        let Some(record) = derived
            .iter()
            .flat_map(|group| group.applications.iter())
            .find(|record| record.id_at(&self.cells.index) == Some(id))
        else {
            return ignored(IgnoredReason::UnknownRow(id));
        };

        if self.selection.is_active() {
            let mode = membership(!self.selection.contains(id));
            return self.update_selection(&[id], Some(mode));
        }

        match &self.cells.row_link {
            Some(link) => {
                let target = link.target(record);
                tracing::debug!(%id, %target, "row navigation requested");
                vec![TableEvent::NavigationRequested(target)]
            }
            None => ignored(IgnoredReason::NoRowLink),
        }
    }

    fn replace_input(&mut self, input: TableInput) -> Vec<TableEvent> {
        let (groups, has_grouping) = input.into_groups();
        self.groups = groups;
        self.has_grouping = has_grouping;
        self.visibility.resize(self.groups.len());

        let known: BTreeSet<RecordId> = self
            .groups
            .iter()
            .flat_map(|group| group.applications.iter())
            .filter_map(|record| record.id_at(&self.cells.index))
            .collect();

        let mut events = vec![TableEvent::InputReplaced {
            groups: self.groups.len(),
        }];
        if self.selection.retain(&known) {
            events.push(TableEvent::SelectionChanged(
                self.selection.selected().to_vec(),
            ));
        }
        events
    }

    fn update_selection(&mut self, ids: &[RecordId], mode: Option<SelectionMode>) -> Vec<TableEvent> {
        if self.selection.update(ids, mode) {
            vec![TableEvent::SelectionChanged(self.selection.selected().to_vec())]
        } else {
            Vec::new()
        }
    }

    fn visibility_event(&self) -> TableEvent {
        TableEvent::GroupVisibilityChanged(self.visibility.as_slice().to_vec())
    }
}

fn ignored(reason: IgnoredReason) -> Vec<TableEvent> {
    tracing::debug!(reason = %reason.message(), "table command ignored");
    vec![TableEvent::Ignored(reason)]
}

const fn membership(checked: bool) -> SelectionMode {
    if checked {
        SelectionMode::Add
    } else {
        SelectionMode::Remove
    }
}
