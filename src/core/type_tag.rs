use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::core::value::Value;

/// Declared kind of a value. Drives which input and which coercion rule apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeTag {
    #[default]
    String,
    Number,
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    DateTimeLocal,
    Time,
    TimeRange,
    Object,
    Array,
    ObjectId,
    Mixed,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown type tag '{0}'")]
pub struct UnknownTypeTag(pub String);

impl TypeTag {
    pub const ALL: [TypeTag; 15] = [
        TypeTag::String,
        TypeTag::Number,
        TypeTag::Integer,
        TypeTag::Decimal,
        TypeTag::Boolean,
        TypeTag::Date,
        TypeTag::DateTime,
        TypeTag::DateTimeLocal,
        TypeTag::Time,
        TypeTag::TimeRange,
        TypeTag::Object,
        TypeTag::Array,
        TypeTag::ObjectId,
        TypeTag::Mixed,
        TypeTag::Custom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::String => "String",
            TypeTag::Number => "Number",
            TypeTag::Integer => "Integer",
            TypeTag::Decimal => "Decimal",
            TypeTag::Boolean => "Boolean",
            TypeTag::Date => "Date",
            TypeTag::DateTime => "DateTime",
            TypeTag::DateTimeLocal => "DateTimeLocal",
            TypeTag::Time => "Time",
            TypeTag::TimeRange => "TimeRange",
            TypeTag::Object => "Object",
            TypeTag::Array => "Array",
            TypeTag::ObjectId => "ObjectId",
            TypeTag::Mixed => "Mixed",
            TypeTag::Custom => "Custom",
        }
    }

    /// Parses a tag name, falling back to `String` for anything unknown.
    pub fn from_name_or_default(name: &str) -> TypeTag {
        name.parse().unwrap_or_default()
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, TypeTag::Number | TypeTag::Integer | TypeTag::Decimal)
    }

    pub fn is_date_family(self) -> bool {
        matches!(
            self,
            TypeTag::Date | TypeTag::DateTime | TypeTag::DateTimeLocal
        )
    }

    pub fn is_container(self) -> bool {
        matches!(self, TypeTag::Object | TypeTag::Array)
    }

    /// Tags whose values are stored as given, without coercion.
    pub fn is_passthrough(self) -> bool {
        matches!(self, TypeTag::ObjectId | TypeTag::Mixed | TypeTag::Custom)
    }

    /// Canonical empty value for the tag.
    pub fn default_value(self) -> Value {
        match self {
            TypeTag::String | TypeTag::Time | TypeTag::ObjectId => Value::Text(String::new()),
            TypeTag::Mixed | TypeTag::Custom => Value::Text(String::new()),
            TypeTag::Number | TypeTag::Integer | TypeTag::Decimal => Value::Number(0.0),
            TypeTag::Boolean => Value::Bool(false),
            TypeTag::Date | TypeTag::DateTime | TypeTag::DateTimeLocal => Value::Date(Utc::now()),
            TypeTag::TimeRange => {
                let mut range = IndexMap::new();
                range.insert("start".to_string(), Value::Text(String::new()));
                range.insert("end".to_string(), Value::Text(String::new()));
                Value::Object(range)
            }
            TypeTag::Object => Value::Object(IndexMap::new()),
            TypeTag::Array => Value::List(Vec::new()),
        }
    }
}

pub fn default_value_for(tag: TypeTag) -> Value {
    tag.default_value()
}

/// Guesses a tag from the runtime shape of a value.
pub fn infer_tag(value: &Value) -> TypeTag {
    match value {
        Value::None => TypeTag::Mixed,
        Value::Bool(_) => TypeTag::Boolean,
        Value::Number(_) => TypeTag::Number,
        Value::Text(_) => TypeTag::String,
        Value::Date(_) => TypeTag::DateTime,
        Value::List(_) => TypeTag::Array,
        Value::Object(_) => TypeTag::Object,
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = UnknownTypeTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        let tag = match normalized.as_str() {
            "string" | "text" => TypeTag::String,
            "number" => TypeTag::Number,
            "integer" | "int" => TypeTag::Integer,
            "decimal" | "float" => TypeTag::Decimal,
            "boolean" | "bool" => TypeTag::Boolean,
            "date" => TypeTag::Date,
            "datetime" => TypeTag::DateTime,
            "datetimelocal" => TypeTag::DateTimeLocal,
            "time" => TypeTag::Time,
            "timerange" => TypeTag::TimeRange,
            "object" => TypeTag::Object,
            "array" => TypeTag::Array,
            "objectid" => TypeTag::ObjectId,
            "mixed" => TypeTag::Mixed,
            "custom" => TypeTag::Custom,
            _ => return Err(UnknownTypeTag(s.to_string())),
        };
        Ok(tag)
    }
}

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for TypeTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
