// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Render-ready projection of a [`TableViewModel`].
//!
//! Everything here is recomputed from the model on demand; a rendering layer
//! only maps it to output and feeds user input back as commands.

use serde_json::{Map, Value};

use crate::selection;
use crate::{
    CellContent, GroupId, LabelKey, LabelRequest, RecordId, SortDirection, TableViewModel,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affordance {
    pub label: LabelRequest,
    pub active: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolbar {
    pub filter: Option<Affordance>,
    pub filter_controls_open: bool,
    pub hide_handled: Option<Affordance>,
    pub selection: Option<Affordance>,
    pub group_visibility: Option<Affordance>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkbox {
    pub checked: bool,
    pub label: LabelRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub title: LabelRequest,
    pub key: String,
    pub sortable: bool,
    /// Set on the active sort column while sorting is enabled.
    pub sort_indicator: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub select_all: Option<Checkbox>,
    pub columns: Vec<HeaderCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: Option<RecordId>,
    pub select: Option<Checkbox>,
    pub cells: Vec<CellContent>,
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupView {
    pub index: usize,
    pub id: Option<GroupId>,
    pub metadata: Map<String, Value>,
    pub collapsible: bool,
    pub visible: bool,
    /// Present only in selection mode.
    pub selected: Option<bool>,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty { label: LabelRequest, colspan: usize },
    Groups(Vec<GroupView>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub toolbar: Option<Toolbar>,
    pub header: Header,
    pub body: Body,
}

impl TableViewModel {
    pub fn view(&self) -> TableView {
        TableView {
            toolbar: self.toolbar(),
            header: self.header(),
            body: self.body(),
        }
    }

    fn toolbar(&self) -> Option<Toolbar> {
        let features = self.features();
        if !features.filtering {
            return None;
        }
        let selecting = self.selection().is_active();
        let filters_active = !self.filters().is_empty();
        let some_hidden = self.visibility().some_hidden();

        Some(Toolbar {
            filter: features.row_filters.then(|| Affordance {
                label: if filters_active {
                    LabelKey::Filtered
                } else {
                    LabelKey::Filter
                }
                .into(),
                active: filters_active,
                enabled: self.filter_controls_enabled(),
            }),
            filter_controls_open: self.filter_controls_open(),
            hide_handled: features.hide_handled.then(|| Affordance {
                label: if self.hides_handled() {
                    LabelKey::FilterShowHandled
                } else {
                    LabelKey::FilterHideHandled
                }
                .into(),
                active: self.hides_handled(),
                enabled: !selecting,
            }),
            selection: features.selection.then(|| Affordance {
                label: if selecting {
                    LabelKey::DisableSelection
                } else {
                    LabelKey::ActivateSelection
                }
                .into(),
                active: selecting,
                enabled: true,
            }),
            group_visibility: self.has_grouping().then(|| Affordance {
                label: if some_hidden {
                    LabelKey::OpenAll
                } else {
                    LabelKey::CloseAll
                }
                .into(),
                active: !some_hidden,
                enabled: true,
            }),
        })
    }

    fn header(&self) -> Header {
        let sortable = self.sorting_enabled();
        let sort = self.sort();
        let select_all = self.selection().is_active().then(|| {
            let checked = self.all_rows_selected();
            Checkbox {
                checked,
                label: if checked {
                    LabelKey::DeselectAllRows
                } else {
                    LabelKey::SelectAllRows
                }
                .into(),
            }
        });

        Header {
            select_all,
            columns: self
                .cells()
                .cols
                .iter()
                .map(|column| HeaderCell {
                    title: LabelRequest::new(&column.title),
                    key: column.key.clone(),
                    sortable,
                    sort_indicator: (sortable && column.key == sort.key).then_some(sort.direction),
                })
                .collect(),
        }
    }

    fn body(&self) -> Body {
        if self.groups().is_empty() {
            return Body::Empty {
                label: LabelKey::NoResults.into(),
                colspan: self.cells().cols.len(),
            };
        }

        let derived = self.derived();
        let index = &self.cells().index;
        let selecting = self.selection().is_active();
        let clickable = self.cells().row_link.is_some();

        let groups = derived
            .iter()
            .enumerate()
            .map(|(position, group)| {
                let selected = selecting.then(|| {
                    selection::row_ids(&derived, index, group.id)
                        .map(|ids| self.selection().covers(&ids))
                        .unwrap_or(false)
                });
                let rows = group
                    .applications
                    .iter()
                    .map(|record| {
                        let id = record.id_at(index);
                        RowView {
                            id,
                            select: selecting.then(|| self.row_checkbox(id)),
                            cells: self
                                .cells()
                                .cols
                                .iter()
                                .map(|column| column.content(record))
                                .collect(),
                            clickable,
                        }
                    })
                    .collect();

                GroupView {
                    index: position,
                    id: group.id,
                    metadata: group.metadata.clone(),
                    collapsible: self.has_grouping(),
                    visible: self.visibility().is_visible(position),
                    selected,
                    rows,
                }
            })
            .collect();

        Body::Groups(groups)
    }

    fn row_checkbox(&self, id: Option<RecordId>) -> Checkbox {
        let checked = id.is_some_and(|id| self.selection().contains(id));
        let key = if checked {
            LabelKey::DeselectRowX
        } else {
            LabelKey::SelectRowX
        };
        let label = match id {
            Some(id) => LabelRequest::from(key).with_param("row", id),
            None => LabelRequest::from(key).with_param("row", ""),
        };
        Checkbox { checked, label }
    }
}
