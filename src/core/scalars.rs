//! Plain value types for tags that carry a format: object ids, times of day
//! and time ranges. Each converts to and from [`Value`] explicitly.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{NaiveTime, Utc};
use indexmap::IndexMap;
use regex::Regex;
use thiserror::Error;

use crate::core::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScalarParseError {
    #[error("'{0}' is not a 24 character hex object id")]
    ObjectId(String),
    #[error("'{0}' is not a time of day (HH:MM or HH:MM:SS)")]
    Time(String),
}

/// A 12-byte identifier written as 24 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId(String);

fn object_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9a-fA-F]{24}$").expect("object id pattern"))
}

impl ObjectId {
    pub fn is_valid(text: &str) -> bool {
        object_id_pattern().is_match(text)
    }

    /// Timestamp seconds followed by a process-local counter.
    pub fn generate() -> Self {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let seconds = Utc::now().timestamp() as u32;
        let count = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(format!("{seconds:08x}{:08x}{count:08x}", std::process::id()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ObjectId {
    type Err = ScalarParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if Self::is_valid(trimmed) {
            Ok(Self(trimmed.to_ascii_lowercase()))
        } else {
            Err(ScalarParseError::ObjectId(s.to_string()))
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ObjectId> for Value {
    fn from(value: ObjectId) -> Self {
        Value::Text(value.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = ScalarParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
            .map(TimeOfDay)
            .map_err(|_| ScalarParseError::Time(s.to_string()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// Start and end times kept as entered text; either side may still be blank.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Reads `{start, end}` from an object value. Missing or non-text sides
    /// become blank; anything other than an object yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let side = |key: &str| {
            map.get(key)
                .and_then(Value::as_text)
                .map(str::to_string)
                .unwrap_or_default()
        };
        Some(Self::new(side("start"), side("end")))
    }

    pub fn to_value(&self) -> Value {
        let mut map = IndexMap::new();
        map.insert("start".to_string(), Value::Text(self.start.clone()));
        map.insert("end".to_string(), Value::Text(self.end.clone()));
        Value::Object(map)
    }

    /// True when both sides parse and the end is not before the start.
    pub fn is_ordered(&self) -> bool {
        match (self.start.parse::<TimeOfDay>(), self.end.parse::<TimeOfDay>()) {
            (Ok(start), Ok(end)) => end >= start,
            _ => false,
        }
    }
}
