// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use crate::{Group, GroupId, RecordId, Result, TableError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Add,
    Remove,
}

/// Selection mode flag plus the selected ids, kept ascending and unique.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    active: bool,
    selected: Vec<RecordId>,
}

impl Selection {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn selected(&self) -> &[RecordId] {
        &self.selected
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.selected.binary_search(&id).is_ok()
    }

    /// Without a mode the selection is replaced wholesale; otherwise `ids`
    /// are unioned in or removed. Returns whether the stored set changed.
    pub fn update(&mut self, ids: &[RecordId], mode: Option<SelectionMode>) -> bool {
        let next: BTreeSet<RecordId> = match mode {
            None => ids.iter().copied().collect(),
            Some(SelectionMode::Add) => self.selected.iter().chain(ids).copied().collect(),
            Some(SelectionMode::Remove) => self
                .selected
                .iter()
                .copied()
                .filter(|id| !ids.contains(id))
                .collect(),
        };
        let next: Vec<RecordId> = next.into_iter().collect();
        if next == self.selected {
            return false;
        }
        self.selected = next;
        true
    }

    pub fn clear(&mut self) -> bool {
        self.update(&[], None)
    }

    /// Set equality with `ids`, ignoring their order.
    pub fn equals_set(&self, ids: &[RecordId]) -> bool {
        let all: BTreeSet<RecordId> = ids.iter().copied().collect();
        all.len() == self.selected.len() && all.iter().zip(&self.selected).all(|(a, b)| a == b)
    }

    /// True when every id in `ids` is selected; vacuously true for none.
    pub fn covers(&self, ids: &[RecordId]) -> bool {
        ids.iter().all(|id| self.contains(*id))
    }

    /// Drops ids that are no longer present in the input data.
    pub fn retain(&mut self, known: &BTreeSet<RecordId>) -> bool {
        let before = self.selected.len();
        self.selected.retain(|id| known.contains(id));
        before != self.selected.len()
    }
}

/// Ids of the derived rows, either for a single group or flattened across
/// every group in derived order. Rows whose index does not resolve to an
/// integer are skipped.
pub fn row_ids(derived: &[Group], index: &str, group: Option<GroupId>) -> Result<Vec<RecordId>> {
    let ids_of = |group: &Group| -> Vec<RecordId> {
        group
            .applications
            .iter()
            .filter_map(|record| {
                let id = record.id_at(index);
                if id.is_none() {
                    tracing::warn!(index, "record has no integer id; left out of selection");
                }
                id
            })
            .collect()
    };

    match group {
        Some(group_id) => derived
            .iter()
            .find(|candidate| candidate.id == Some(group_id))
            .map(ids_of)
            .ok_or(TableError::GroupNotFound(group_id)),
        None => Ok(derived.iter().flat_map(ids_of).collect()),
    }
}
