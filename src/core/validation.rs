//! Field-level validation of records before they are committed.
//!
//! Rules only look at fields present on the item; a missing field is never an
//! error. Results map each failing field to its messages in rule order.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::coerce::parse_date;
use crate::core::scalars::{ObjectId, TimeOfDay, TimeRange};
use crate::core::schema::SchemaProvider;
use crate::core::type_tag::TypeTag;
use crate::core::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationResult {
    errors: IndexMap<String, Vec<String>>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors_for(&self, field: &str) -> &[String] {
        self.errors
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldRule {
    pub name: String,
    pub required: bool,
    pub required_message: Option<String>,
    pub max_length: Option<usize>,
    pub max_length_message: Option<String>,
    pub allowed: Option<Vec<String>>,
    pub tag: Option<TypeTag>,
}

impl FieldRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = true;
        self.required_message = Some(message.into());
        self
    }

    pub fn max_length(mut self, max: usize, message: impl Into<String>) -> Self {
        self.max_length = Some(max);
        self.max_length_message = Some(message.into());
        self
    }

    pub fn allowed<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn tag(mut self, tag: TypeTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub(crate) fn required_text(&self) -> String {
        self.required_message
            .clone()
            .unwrap_or_else(|| format!("{} is required", capitalize(&self.name)))
    }

    pub(crate) fn max_length_text(&self, max: usize) -> String {
        self.max_length_message
            .clone()
            .unwrap_or_else(|| format!("{} must be at most {max} characters", self.name))
    }

    pub(crate) fn tag_text(&self, tag: TypeTag) -> String {
        format!("{} must be of type {tag}", self.name)
    }

    fn check(&self, value: &Value, result: &mut ValidationResult) {
        if self.required && is_blank(value) {
            result.push(&self.name, self.required_text());
        }
        if value.is_none() {
            return;
        }

        if let (Some(max), Value::Text(text)) = (self.max_length, value)
            && text.chars().count() > max
        {
            result.push(&self.name, self.max_length_text(max));
        }

        if let Some(allowed) = &self.allowed {
            let shown = value.to_text_scalar().unwrap_or_else(|| value.summary());
            if !allowed.iter().any(|option| *option == shown) {
                result.push(
                    &self.name,
                    format!("{shown} is not a valid option for {}", self.name),
                );
            }
        }

        if let Some(tag) = self.tag
            && !matches_tag(value, tag)
        {
            result.push(&self.name, self.tag_text(tag));
        }
    }
}

/// Checks a value field against the tag named by a sibling type field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueCheck {
    pub value_field: String,
    pub type_field: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeRule {
    pub start_field: String,
    pub end_field: String,
    #[serde(default = "default_range_message")]
    pub message: String,
}

fn default_range_message() -> String {
    "End date must be after start date".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSchema {
    #[serde(default)]
    pub fields: Vec<FieldRule>,
    #[serde(default)]
    pub value_check: Option<ValueCheck>,
    #[serde(default)]
    pub date_range: Option<DateRangeRule>,
}

impl Default for ValidationSchema {
    fn default() -> Self {
        Self::stats()
    }
}

impl ValidationSchema {
    pub fn empty() -> Self {
        Self {
            fields: Vec::new(),
            value_check: None,
            date_range: None,
        }
    }

    /// Rules for a Stats entry: a keyed, typed data point with an optional
    /// time span.
    pub fn stats() -> Self {
        Self {
            fields: vec![
                FieldRule::new("key")
                    .required("Key is required")
                    .max_length(100, "Key must be 100 characters or less")
                    .tag(TypeTag::String),
                FieldRule::new("dataType").allowed(TypeTag::ALL.iter().map(|tag| tag.name())),
                FieldRule::new("description")
                    .max_length(500, "Description must be 500 characters or less"),
                FieldRule::new("timestamp").tag(TypeTag::Date),
                FieldRule::new("endDate").tag(TypeTag::Date),
            ],
            value_check: Some(ValueCheck {
                value_field: "dataValue".to_string(),
                type_field: "dataType".to_string(),
            }),
            date_range: Some(DateRangeRule {
                start_field: "timestamp".to_string(),
                end_field: "endDate".to_string(),
                message: default_range_message(),
            }),
        }
    }

    pub fn with_field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|rule| rule.name == name)
    }

    /// Validates a record. Anything other than an object has no fields and
    /// is therefore valid.
    pub fn validate(&self, item: &Value) -> ValidationResult {
        let mut result = ValidationResult::new();
        let Some(fields) = item.as_object() else {
            return result;
        };

        for rule in &self.fields {
            if let Some(value) = fields.get(rule.name.as_str()) {
                rule.check(value, &mut result);
            }
        }

        if let Some(check) = &self.value_check
            && let Some(value) = fields.get(check.value_field.as_str())
            && !value.is_none()
            && let Some(tag) = fields
                .get(check.type_field.as_str())
                .and_then(Value::as_text)
                .and_then(|name| name.parse::<TypeTag>().ok())
            && !matches_tag(value, tag)
        {
            result.push(&check.value_field, data_value_message(tag));
        }

        if let Some(range) = &self.date_range
            && let Some(start) = fields.get(range.start_field.as_str()).and_then(date_of)
            && let Some(end) = fields.get(range.end_field.as_str()).and_then(date_of)
            && end < start
        {
            result.push(&range.end_field, range.message.clone());
        }

        result
    }
}

impl SchemaProvider for ValidationSchema {
    fn type_tag(&self, field: &str) -> Option<TypeTag> {
        self.field(field).and_then(|rule| rule.tag)
    }
}

/// Validates a Stats record with the default rules.
pub fn validate(item: &Value) -> ValidationResult {
    ValidationSchema::stats().validate(item)
}

/// Whether a value already has the runtime shape a tag declares. Unlike
/// coercion this never converts: the text `"42"` is not a Number.
pub fn matches_tag(value: &Value, tag: TypeTag) -> bool {
    match tag {
        TypeTag::String => matches!(value, Value::Text(_)),
        TypeTag::Number | TypeTag::Decimal => matches!(value, Value::Number(_)),
        TypeTag::Integer => matches!(value, Value::Number(n) if n.fract() == 0.0),
        TypeTag::Boolean => matches!(value, Value::Bool(_)),
        TypeTag::Date | TypeTag::DateTime | TypeTag::DateTimeLocal => date_of(value).is_some(),
        TypeTag::Time => match value {
            Value::Text(text) => text.is_empty() || text.parse::<TimeOfDay>().is_ok(),
            _ => false,
        },
        TypeTag::TimeRange => TimeRange::from_value(value).is_some(),
        TypeTag::Object => matches!(value, Value::Object(_)),
        TypeTag::Array => matches!(value, Value::List(_)),
        TypeTag::ObjectId => value.as_text().is_some_and(ObjectId::is_valid),
        TypeTag::Mixed | TypeTag::Custom => true,
    }
}

fn data_value_message(tag: TypeTag) -> String {
    match tag {
        TypeTag::String => "Value must be a string".to_string(),
        TypeTag::Number | TypeTag::Decimal => "Value must be a number".to_string(),
        TypeTag::Integer => "Value must be a whole number".to_string(),
        TypeTag::Boolean => "Value must be a boolean".to_string(),
        TypeTag::Date | TypeTag::DateTime | TypeTag::DateTimeLocal => {
            "Value must be a valid date".to_string()
        }
        TypeTag::Array => "Value must be an array".to_string(),
        TypeTag::Object => "Value must be an object".to_string(),
        other => format!("Value must be of type {other}"),
    }
}

fn date_of(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Date(date) => Some(*date),
        Value::Text(text) => parse_date(text),
        _ => None,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::None => true,
        Value::Text(text) => text.trim().is_empty(),
        _ => false,
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldRule, ValidationSchema, matches_tag, validate};
    use crate::core::type_tag::TypeTag;
    use crate::core::value::Value;
    use serde_json::json;

    fn item(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn end_before_start_is_reported_on_end_field() {
        let result = validate(&item(json!({"timestamp": "2025-01-10", "endDate": "2025-01-05"})));
        assert_eq!(result.fields().collect::<Vec<_>>(), vec!["endDate"]);
        assert_eq!(
            result.errors_for("endDate"),
            ["End date must be after start date"]
        );
    }

    #[test]
    fn equal_dates_are_valid() {
        let result = validate(&item(json!({"timestamp": "2025-01-10", "endDate": "2025-01-10"})));
        assert!(result.is_valid());
    }

    #[test]
    fn valid_stats_item_has_no_errors() {
        let result = validate(&item(json!({
            "key": "weight",
            "dataType": "Number",
            "dataValue": 72.5,
            "description": "morning weigh-in",
            "timestamp": "2025-01-10T07:00:00Z",
        })));
        assert!(result.is_valid(), "{result:?}");
    }

    #[test]
    fn missing_fields_are_skipped() {
        assert!(validate(&item(json!({}))).is_valid());
        assert!(validate(&Value::Text("not a record".into())).is_valid());
    }

    #[test]
    fn blank_key_and_long_key_use_field_messages() {
        let result = validate(&item(json!({"key": "  "})));
        assert_eq!(result.errors_for("key"), ["Key is required"]);

        let result = validate(&item(json!({"key": "k".repeat(101)})));
        assert_eq!(result.errors_for("key"), ["Key must be 100 characters or less"]);
    }

    #[test]
    fn unknown_data_type_is_not_a_valid_option() {
        let result = validate(&item(json!({"dataType": "Currency", "dataValue": 3})));
        assert_eq!(
            result.errors_for("dataType"),
            ["Currency is not a valid option for dataType"]
        );
        assert!(result.errors_for("dataValue").is_empty());
    }

    #[test]
    fn data_value_is_checked_against_declared_type() {
        let cases = [
            (json!({"dataType": "Number", "dataValue": "42"}), "Value must be a number"),
            (json!({"dataType": "Boolean", "dataValue": "yes"}), "Value must be a boolean"),
            (json!({"dataType": "Date", "dataValue": "soon"}), "Value must be a valid date"),
            (json!({"dataType": "Array", "dataValue": {}}), "Value must be an array"),
            (json!({"dataType": "Object", "dataValue": []}), "Value must be an object"),
            (json!({"dataType": "String", "dataValue": 1}), "Value must be a string"),
        ];
        for (record, message) in cases {
            let result = validate(&item(record));
            assert_eq!(result.errors_for("dataValue"), [message]);
        }
        let ok = validate(&item(json!({"dataType": "Date", "dataValue": "2025-03-01"})));
        assert!(ok.is_valid());
    }

    #[test]
    fn custom_schema_rules_apply_in_order() {
        let schema = ValidationSchema::empty().with_field(
            FieldRule::new("mood")
                .allowed(["good", "bad"])
                .tag(TypeTag::String),
        );
        let result = schema.validate(&item(json!({"mood": 3})));
        assert_eq!(
            result.errors_for("mood"),
            ["3 is not a valid option for mood", "mood must be of type String"]
        );
    }

    #[test]
    fn matches_tag_does_not_convert() {
        assert!(!matches_tag(&Value::Text("42".into()), TypeTag::Number));
        assert!(matches_tag(&Value::Number(42.0), TypeTag::Integer));
        assert!(!matches_tag(&Value::Number(4.2), TypeTag::Integer));
        assert!(matches_tag(&Value::Text("2025-01-01".into()), TypeTag::DateTime));
        assert!(matches_tag(&Value::Text("".into()), TypeTag::Time));
        assert!(matches_tag(&Value::None, TypeTag::Mixed));
    }

    #[test]
    fn schema_deserializes_from_yaml() {
        let schema: ValidationSchema = serde_yaml::from_str(
            "fields:\n  - name: title\n    required: true\n    maxLength: 5\n",
        )
        .expect("schema");
        let result = schema.validate(&item(json!({"title": "too long"})));
        assert_eq!(result.errors_for("title"), ["title must be at most 5 characters"]);
        assert!(schema.date_range.is_none());
    }
}
