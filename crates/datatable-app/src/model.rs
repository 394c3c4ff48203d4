// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::*;

/// Status value marking a record as already handled.
pub const HANDLED_STATUS: &str = "validated";

/// Field holding the handled status on every record.
pub const STATUS_FIELD: &str = "status";

/// A value resolved from a record through a dotted key path.
///
/// `Absent` stands for a path that did not resolve; it flows through
/// filtering, sorting and display instead of failing.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Absent,
    Null,
    Bool(bool),
    /// Integral JSON numbers that fit in `i64`; kept exact.
    Int(i64),
    Number(f64),
    Text(String),
    Structured(Value),
}

impl FieldValue {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(value) => Self::Bool(*value),
            Value::Number(number) => match (number.as_i64(), number.as_f64()) {
                (Some(int), _) => Self::Int(int),
                (None, Some(float)) => Self::Number(float),
                (None, None) => Self::Structured(value.clone()),
            },
            Value::String(text) => Self::Text(text.clone()),
            Value::Array(_) | Value::Object(_) => Self::Structured(value.clone()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn display(&self) -> String {
        match self {
            Self::Absent | Self::Null => String::new(),
            Self::Bool(value) => value.to_string(),
            Self::Int(value) => value.to_string(),
            Self::Number(value) => format_number(*value),
            Self::Text(value) => value.clone(),
            Self::Structured(value) => value.to_string(),
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Int(_) | Self::Number(_) => 1,
            Self::Text(_) => 2,
            Self::Structured(_) => 3,
            Self::Null => 4,
            Self::Absent => 5,
        }
    }

    /// Ascending order used by the sort step. Values of different kinds are
    /// ordered by kind; null and absent values come last.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(left), Self::Bool(right)) => left.cmp(right),
            (Self::Int(left), Self::Int(right)) => left.cmp(right),
            (Self::Number(left), Self::Number(right)) => left.total_cmp(right),
            (Self::Int(left), Self::Number(right)) => cmp_int_float(*left, *right),
            (Self::Number(left), Self::Int(right)) => cmp_int_float(*right, *left).reverse(),
            (Self::Text(left), Self::Text(right)) => left.cmp(right),
            (Self::Structured(left), Self::Structured(right)) => {
                left.to_string().cmp(&right.to_string())
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Exact equality per kind. Structured values never compare equal, so a
/// filter can only ever match scalar fields.
impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Absent, Self::Absent) | (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Number(left), Self::Number(right)) => left == right,
            (Self::Int(left), Self::Number(right)) | (Self::Number(right), Self::Int(left)) => {
                !right.is_nan() && cmp_int_float(*left, *right) == Ordering::Equal
            }
            (Self::Text(left), Self::Text(right)) => left == right,
            _ => false,
        }
    }
}

/// Goes through floats only to order values far apart; a whole float within
/// `i64` range is compared as an integer so large ids stay exact.
fn cmp_int_float(int: i64, float: f64) -> Ordering {
    let coarse = (int as f64).total_cmp(&float);
    if coarse != Ordering::Equal || float.fract() != 0.0 {
        return coarse;
    }
    if float >= i64::MIN as f64 && float < i64::MAX as f64 {
        int.cmp(&(float as i64))
    } else {
        coarse
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// One table row. The payload is owned by the caller and never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn lookup(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(&self.0, |current, segment| match current {
            Value::Object(fields) => fields.get(segment),
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index)),
            _ => None,
        })
    }

    pub fn resolve(&self, path: &str) -> FieldValue {
        self.lookup(path)
            .map(FieldValue::from_json)
            .unwrap_or(FieldValue::Absent)
    }

    pub fn id_at(&self, index_path: &str) -> Option<RecordId> {
        self.lookup(index_path)
            .and_then(Value::as_i64)
            .map(RecordId::new)
    }

    pub fn is_handled(&self) -> bool {
        self.resolve(STATUS_FIELD) == FieldValue::Text(HANDLED_STATUS.to_owned())
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A collapsible cluster of records. Metadata other than `id` and
/// `applications` is carried through derivation untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<GroupId>,
    #[serde(default)]
    pub applications: Vec<Record>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Group {
    pub fn new(id: GroupId, applications: Vec<Record>) -> Self {
        Self {
            id: Some(id),
            applications,
            metadata: Map::new(),
        }
    }

    /// The single synthetic group used when grouping is disabled.
    pub fn implicit(applications: Vec<Record>) -> Self {
        Self {
            id: None,
            applications,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_owned(), value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub key: String,
    pub value: Value,
}

impl FilterOption {
    pub fn new(key: &str, value: impl Into<Value>) -> Self {
        Self {
            key: key.to_owned(),
            value: value.into(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.resolve(&self.key) == FieldValue::from_json(&self.value)
    }
}
