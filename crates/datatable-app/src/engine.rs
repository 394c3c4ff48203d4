// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Derivation of the display-ready view from raw grouped records.
//!
//! The pipeline is filter, then hide-handled, then sort, applied to every
//! group independently. Group order and metadata pass through unchanged.

use std::cmp::Ordering;

use crate::{FilterOption, Group, Record, SortDirection, SortState};

/// Recomputes the derived view from scratch. Pure: identical inputs give
/// structurally identical output.
pub fn derive(
    groups: &[Group],
    sort: &SortState,
    filters: &[FilterOption],
    hide_handled: bool,
) -> Vec<Group> {
    groups
        .iter()
        .map(|group| Group {
            id: group.id,
            applications: derive_records(&group.applications, sort, filters, hide_handled),
            metadata: group.metadata.clone(),
        })
        .collect()
}

fn derive_records(
    records: &[Record],
    sort: &SortState,
    filters: &[FilterOption],
    hide_handled: bool,
) -> Vec<Record> {
    let mut rows: Vec<Record> = records
        .iter()
        .filter(|record| matches_filters(record, filters))
        .filter(|record| !(hide_handled && record.is_handled()))
        .cloned()
        .collect();

    // `sort_by` is stable, and reversing the comparator keeps ties in input
    // order for descending sorts too.
    rows.sort_by(|left, right| compare_records(left, right, sort));
    rows
}

/// AND over every option; an empty filter set matches everything.
pub fn matches_filters(record: &Record, filters: &[FilterOption]) -> bool {
    filters.iter().all(|filter| filter.matches(record))
}

pub fn compare_records(left: &Record, right: &Record, sort: &SortState) -> Ordering {
    let order = left
        .resolve(&sort.key)
        .cmp_value(&right.resolve(&sort.key));
    match sort.direction {
        SortDirection::Asc => order,
        SortDirection::Desc => order.reverse(),
    }
}

pub fn derived_row_count(derived: &[Group]) -> usize {
    derived.iter().map(|group| group.applications.len()).sum()
}
