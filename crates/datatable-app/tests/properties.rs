// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use datatable_app::engine::{derive, matches_filters};
use datatable_app::{
    CellConfig, Column, FilterOption, Group, RecordId, SelectionMode, SortDirection, SortState,
    TableCommand, TableFeatures, TableInput, TableViewModel,
};
use datatable_testkit::{ApplicationFaker, statuses};
use serde_json::Value;
use std::collections::BTreeSet;

const SEEDS: std::ops::Range<u64> = 0..40;

fn ids(groups: &[Group]) -> Vec<Option<RecordId>> {
    groups
        .iter()
        .flat_map(|group| group.applications.iter())
        .map(|record| record.id_at("id"))
        .collect()
}

fn cells() -> CellConfig {
    CellConfig {
        cols: vec![
            Column::new("Application.headings.applicant", "applicantName"),
            Column::new("Application.headings.organisation", "organisation.name"),
            Column::new("Application.headings.status", "status"),
        ],
        index: "id".to_owned(),
        sorting: "applicantName".to_owned(),
        order: SortDirection::Asc,
        row_link: None,
    }
}

#[test]
fn derivation_is_idempotent() {
    for seed in SEEDS {
        let mut faker = ApplicationFaker::new(seed);
        let groups = faker.grouped(4, 10);
        let sort = SortState::new("organisation.name", SortDirection::Desc);
        let filters = vec![FilterOption::new("status", faker.status())];
        let hide = faker.coin();

        let first = derive(&groups, &sort, &filters, hide);
        let second = derive(&groups, &sort, &filters, hide);
        assert_eq!(first, second, "seed {seed}");
    }
}

#[test]
fn sort_is_stable_in_both_directions() {
    for seed in SEEDS {
        let mut faker = ApplicationFaker::new(seed);
        let groups = faker.grouped(3, 12);
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let derived = derive(&groups, &SortState::new("status", direction), &[], false);
            for (raw, sorted) in groups.iter().zip(&derived) {
                let position = |id: Option<RecordId>| {
                    raw.applications
                        .iter()
                        .position(|record| record.id_at("id") == id)
                };
                for pair in sorted.applications.windows(2) {
                    if pair[0].resolve("status") == pair[1].resolve("status") {
                        assert!(
                            position(pair[0].id_at("id")) < position(pair[1].id_at("id")),
                            "seed {seed} {direction:?}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn filters_are_conjunctive_and_monotone() {
    for seed in SEEDS {
        let mut faker = ApplicationFaker::new(seed);
        let groups = faker.grouped(3, 15);
        let sort = SortState::new("id", SortDirection::Asc);
        let filters = vec![
            FilterOption::new("status", faker.status()),
            FilterOption::new("organisation.city", "Helsinki"),
        ];

        for record in groups.iter().flat_map(|group| group.applications.iter()) {
            let all = filters.iter().all(|filter| filter.matches(record));
            assert_eq!(matches_filters(record, &filters), all, "seed {seed}");
        }

        let narrow: BTreeSet<_> = ids(&derive(&groups, &sort, &filters, false))
            .into_iter()
            .collect();
        for dropped in 0..filters.len() {
            let mut fewer = filters.clone();
            fewer.remove(dropped);
            let wide: BTreeSet<_> = ids(&derive(&groups, &sort, &fewer, false))
                .into_iter()
                .collect();
            assert!(narrow.is_subset(&wide), "seed {seed}");
        }
    }
}

#[test]
fn hide_handled_removes_exactly_validated_rows() {
    for seed in SEEDS {
        let groups = ApplicationFaker::new(seed).grouped(3, 10);
        let sort = SortState::new("id", SortDirection::Asc);
        let shown = derive(&groups, &sort, &[], false);
        let hidden = derive(&groups, &sort, &[], true);
        for (all, kept) in shown.iter().zip(&hidden) {
            let expected: Vec<_> = all
                .applications
                .iter()
                .filter(|record| record.resolve("status").display() != "validated")
                .cloned()
                .collect();
            assert_eq!(kept.applications, expected, "seed {seed}");
        }
    }
}

#[test]
fn selection_stays_sorted_and_unique() {
    for seed in SEEDS {
        let mut faker = ApplicationFaker::new(seed);
        let mut selection = datatable_app::Selection::default();
        for _ in 0..30 {
            let batch: Vec<RecordId> = (0..faker.int_n(6))
                .map(|_| RecordId::new(faker.int_n(20) as i64))
                .collect();
            let mode = match faker.int_n(3) {
                0 => None,
                1 => Some(SelectionMode::Add),
                _ => Some(SelectionMode::Remove),
            };
            selection.update(&batch, mode);
            assert!(
                selection.selected().windows(2).all(|pair| pair[0] < pair[1]),
                "seed {seed}: {:?}",
                selection.selected()
            );
        }
    }
}

#[test]
fn select_all_then_drop_one_flips_checkbox() -> Result<()> {
    for seed in SEEDS {
        let groups = ApplicationFaker::new(seed).grouped(3, 6);
        let mut model = TableViewModel::new(TableInput::Grouped(groups), cells())
            .with_features(TableFeatures::all());
        model.dispatch(TableCommand::ToggleSelectionMode)?;
        model.dispatch(TableCommand::SelectAll(true))?;
        assert!(model.all_rows_selected(), "seed {seed}");

        let Some(first) = model.row_ids(None)?.first().copied() else {
            continue;
        };
        model.dispatch(TableCommand::SelectRow {
            id: first,
            checked: false,
        })?;
        assert!(!model.all_rows_selected(), "seed {seed}");
    }
    Ok(())
}

#[test]
fn view_model_matches_engine_output() -> Result<()> {
    for seed in SEEDS {
        let mut faker = ApplicationFaker::new(seed);
        let groups = faker.grouped(3, 8);
        let status = faker.status();
        let mut model = TableViewModel::new(TableInput::Grouped(groups.clone()), cells())
            .with_features(TableFeatures::all());
        model.dispatch(TableCommand::ApplyFilters(vec![FilterOption::new(
            "status", status,
        )]))?;
        model.dispatch(TableCommand::SortBy("organisation.name".to_owned()))?;

        let expected = derive(
            &groups,
            &SortState::new("organisation.name", SortDirection::Asc),
            &[FilterOption::new("status", Value::from(status))],
            false,
        );
        assert_eq!(model.derived(), expected, "seed {seed}");
    }
    Ok(())
}

#[test]
fn generated_statuses_include_the_handled_sentinel() {
    assert!(statuses().contains(&"validated"));
}
