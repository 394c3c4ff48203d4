// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Shown/hidden flag per group index. Length tracks the group count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupVisibility(Vec<bool>);

impl GroupVisibility {
    pub fn all_shown(count: usize) -> Self {
        Self(vec![true; count])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    pub fn some_hidden(&self) -> bool {
        self.0.iter().any(|shown| !shown)
    }

    /// Open all when forced or when anything is hidden, else close all.
    /// Returns the value every entry now holds.
    pub fn toggle_all(&mut self, force_open: bool) -> bool {
        let open = force_open || self.some_hidden();
        self.0.iter_mut().for_each(|shown| *shown = open);
        open
    }

    /// Flips one entry. `None` when `index` is out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let shown = self.0.get_mut(index)?;
        *shown = !*shown;
        Some(*shown)
    }

    /// Keeps existing entries and shows any new trailing groups.
    pub fn resize(&mut self, count: usize) {
        self.0.resize(count, true);
    }
}
