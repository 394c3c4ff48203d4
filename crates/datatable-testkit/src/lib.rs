// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use datatable_app::{Group, GroupId, Record};
use serde_json::json;
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, Month, OffsetDateTime, Time};

const STATUSES: [&str; 6] = [
    "in_review",
    "review_done",
    "allocated",
    "validated",
    "handled",
    "declined",
];

const ROUND_NAMES: [&str; 8] = [
    "Spring season",
    "Summer season",
    "Autumn season",
    "Winter season",
    "Youth sports",
    "Culture halls",
    "School gyms",
    "Open venues",
];

const ORGANISATIONS: [&str; 14] = [
    "Rowing Club",
    "Chess Society",
    "Youth Choir",
    "Basketball Academy",
    "Senior Dancers",
    "Theatre Group",
    "Floorball Team",
    "Climbing Collective",
    "Orchestra",
    "Yoga Circle",
    "Badminton Club",
    "Film Society",
    "Judo Club",
    "Scout Troop",
];

const CITIES: [&str; 8] = [
    "Helsinki", "Espoo", "Vantaa", "Tampere", "Turku", "Oulu", "Lahti", "Kuopio",
];

const FIRST_NAMES: [&str; 12] = [
    "Aino", "Eero", "Helmi", "Onni", "Sofia", "Leo", "Ella", "Veeti", "Iida", "Elias", "Lilja",
    "Juho",
];
const LAST_NAMES: [&str; 12] = [
    "Korhonen", "Virtanen", "Nieminen", "Mäkinen", "Hämäläinen", "Laine", "Heikkinen", "Koskinen",
    "Järvinen", "Lehtonen", "Salminen", "Rantanen",
];

const SPACES: [&str; 10] = [
    "Main hall",
    "Gym A",
    "Gym B",
    "Studio",
    "Pool lane 1",
    "Pool lane 2",
    "Auditorium",
    "Meeting room",
    "Ice rink",
    "Field 3",
];

const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of application records and application-round groups.
/// Ids are handed out sequentially so every generated record is unique
/// within one faker.
#[derive(Debug, Clone)]
pub struct ApplicationFaker {
    rng: DeterministicRng,
    seed: u64,
    next_record_id: i64,
    next_group_id: i64,
}

impl ApplicationFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
            next_record_id: 1,
            next_group_id: 1,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn application(&mut self) -> Record {
        let id = self.next_record_id;
        self.next_record_id += 1;

        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let organisation = self.pick(&ORGANISATIONS);
        let city = self.pick(&CITIES);
        let status = self.pick(&STATUSES);
        let space = self.pick(&SPACES);
        let hours = self.int_range_i64(1, 40);
        let received = self
            .date_in_year(REFERENCE_YEAR)
            .format(&Rfc3339)
            .unwrap_or_default();

        let mut value = json!({
            "id": id,
            "status": status,
            "applicantName": format!("{first} {last}"),
            "organisation": {"name": organisation, "city": city},
            "space": space,
            "hours": hours,
            "receivedAt": received,
        });
        // Some applicants apply as individuals; keeps absent paths in play.
        if self.rng.int_n(5) == 0
            && let Some(fields) = value.as_object_mut()
        {
            fields.remove("organisation");
        }
        Record::new(value)
    }

    pub fn applications(&mut self, count: usize) -> Vec<Record> {
        (0..count).map(|_| self.application()).collect()
    }

    pub fn application_round(&mut self, rows: usize) -> Group {
        let id = self.next_group_id;
        self.next_group_id += 1;
        let name = self.pick(&ROUND_NAMES);
        let applications = self.applications(rows);
        Group::new(GroupId::new(id), applications).with_metadata("name", json!(name))
    }

    /// Between one and `max_groups` rounds, each with up to `max_rows` rows.
    pub fn grouped(&mut self, max_groups: usize, max_rows: usize) -> Vec<Group> {
        let groups = 1 + self.int_n(max_groups.max(1));
        (0..groups)
            .map(|_| {
                let rows = self.int_n(max_rows + 1);
                self.application_round(rows)
            })
            .collect()
    }

    pub fn status(&mut self) -> &'static str {
        self.pick(&STATUSES)
    }

    pub fn coin(&mut self) -> bool {
        self.rng.bool()
    }

    pub fn date_in_year(&mut self, year: i32) -> OffsetDateTime {
        let start = midnight_utc(year, Month::January, 1);
        let offset_days = self.int_range_i64(0, 364);
        let offset_minutes = self.int_range_i64(0, 24 * 60 - 1);
        start + Duration::days(offset_days) + Duration::minutes(offset_minutes)
    }

    fn pick<'a>(&mut self, values: &'a [&'a str]) -> &'a str {
        values[self.rng.int_n(values.len())]
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        min + self.rng.int_n((max - min + 1) as usize) as i64
    }
}

/// Writes `groups` as a JSON data file in a fresh temp directory.
pub fn write_groups_json(groups: &[Group]) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("groups.json");
    let raw = serde_json::to_string_pretty(groups).context("encode groups")?;
    std::fs::write(&path, raw).with_context(|| format!("write {}", path.display()))?;
    Ok((dir, path))
}

pub fn statuses() -> &'static [&'static str] {
    &STATUSES
}

fn midnight_utc(year: i32, month: Month, day: u8) -> OffsetDateTime {
    let date = Date::from_calendar_date(year, month, day).expect("valid calendar date");
    date.with_time(Time::MIDNIGHT).assume_utc()
}
