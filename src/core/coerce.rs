//! Total conversion of arbitrary values into the canonical shape of a tag.
//!
//! Nothing here fails: malformed input degrades to the nearest well-formed
//! value so an editor stays usable while the user is still typing.
//!
//! | Target            | Rule                                                          |
//! |-------------------|---------------------------------------------------------------|
//! | String, Time      | display text of the value, `null` becomes `""`                |
//! | Number family     | numeric reading, `0` when unreadable; Integer truncates      |
//! | Boolean           | truthiness; text is `true` only for `true` / `1` / `yes`      |
//! | Date family       | parsed date, now when unreadable                              |
//! | Array / Object    | kept when the shape matches, otherwise empty                  |
//! | TimeRange         | `{start, end}` text, blank sides when missing                 |
//! | ObjectId, Mixed, Custom | unchanged                                               |

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use tracing::trace;

use crate::core::scalars::TimeRange;
use crate::core::type_tag::TypeTag;
use crate::core::value::{Value, format_number};

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub fn coerce(value: &Value, tag: TypeTag) -> Value {
    match tag {
        TypeTag::String | TypeTag::Time => match value {
            Value::None => tag.default_value(),
            other => Value::Text(to_text(other)),
        },
        TypeTag::Number | TypeTag::Decimal => Value::Number(to_number(value)),
        TypeTag::Integer => Value::Number(to_number(value).trunc()),
        TypeTag::Boolean => Value::Bool(to_bool(value)),
        TypeTag::Date | TypeTag::DateTime | TypeTag::DateTimeLocal => {
            Value::Date(to_date(value).unwrap_or_else(|| {
                trace!(%tag, "unreadable date replaced with now");
                Utc::now()
            }))
        }
        TypeTag::Array => match value {
            Value::List(_) => value.clone(),
            _ => Value::List(Vec::new()),
        },
        TypeTag::Object => match value {
            Value::Object(_) => value.clone(),
            _ => Value::Object(IndexMap::new()),
        },
        TypeTag::TimeRange => TimeRange::from_value(value)
            .map(|range| range.to_value())
            .unwrap_or_else(|| tag.default_value()),
        TypeTag::ObjectId | TypeTag::Mixed | TypeTag::Custom => value.clone(),
    }
}

/// Converts raw text typed into an input for `tag`.
///
/// Mixed text is read as JSON when it parses and kept as text otherwise;
/// container tags read JSON before coercing.
pub fn coerce_input(raw: &str, tag: TypeTag) -> Value {
    match tag {
        TypeTag::Mixed => parse_mixed_input(raw),
        TypeTag::Object | TypeTag::Array | TypeTag::TimeRange => {
            coerce(&parse_mixed_input(raw), tag)
        }
        _ => coerce(&Value::Text(raw.to_string()), tag),
    }
}

/// Reads free text as JSON, keeping the literal text when it does not parse.
pub fn parse_mixed_input(raw: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Value::from(json),
        Err(err) => {
            trace!(error = %err, "mixed input kept as text");
            Value::Text(raw.to_string())
        }
    }
}

/// Parses the date spellings accepted by date inputs. Zone-less values are
/// read as UTC.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

fn to_text(value: &Value) -> String {
    match value {
        Value::Text(text) => text.clone(),
        Value::List(_) | Value::Object(_) => {
            serde_json::to_string(&value.to_json()).unwrap_or_default()
        }
        other => other.to_text_scalar().unwrap_or_default(),
    }
}

fn to_number(value: &Value) -> f64 {
    let n = match value {
        Value::None => 0.0,
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        Value::Number(n) => *n,
        Value::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Value::Date(date) => date.timestamp_millis() as f64,
        Value::List(list) if list.len() == 1 => to_number(&list[0]),
        Value::List(list) if list.is_empty() => 0.0,
        Value::List(_) | Value::Object(_) => f64::NAN,
    };
    if n.is_finite() {
        n
    } else {
        trace!(value = %format_number(n), "non-finite number replaced with 0");
        0.0
    }
}

fn to_bool(value: &Value) -> bool {
    match value {
        Value::None => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::Text(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes"
        ),
        Value::Date(_) | Value::List(_) | Value::Object(_) => true,
    }
}

fn to_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Date(date) => Some(*date),
        Value::Text(text) => parse_date(text),
        Value::Number(n) if n.is_finite() => DateTime::from_timestamp_millis(*n as i64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{coerce, coerce_input, parse_date, parse_mixed_input};
    use crate::core::type_tag::{TypeTag, default_value_for};
    use crate::core::value::Value;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn samples() -> Vec<Value> {
        vec![
            Value::None,
            Value::Bool(true),
            Value::Number(42.0),
            Value::Number(-3.75),
            Value::Text(String::new()),
            Value::Text("42".into()),
            Value::Text("yes".into()),
            Value::Text("not a number".into()),
            Value::Text("2025-01-10".into()),
            Value::Text("{bad json".into()),
            Value::Date(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
            Value::from(json!([1, "two"])),
            Value::from(json!([7])),
            Value::from(json!({"start": "08:00", "end": "09:00", "x": 1})),
        ]
    }

    fn has_canonical_shape(value: &Value, tag: TypeTag) -> bool {
        match tag {
            TypeTag::String | TypeTag::Time => matches!(value, Value::Text(_)),
            TypeTag::Number | TypeTag::Decimal => {
                matches!(value, Value::Number(n) if n.is_finite())
            }
            TypeTag::Integer => matches!(value, Value::Number(n) if n.fract() == 0.0),
            TypeTag::Boolean => matches!(value, Value::Bool(_)),
            TypeTag::Date | TypeTag::DateTime | TypeTag::DateTimeLocal => {
                matches!(value, Value::Date(_))
            }
            TypeTag::Array => matches!(value, Value::List(_)),
            TypeTag::Object | TypeTag::TimeRange => matches!(value, Value::Object(_)),
            TypeTag::ObjectId | TypeTag::Mixed | TypeTag::Custom => true,
        }
    }

    #[test]
    fn coercion_is_total_and_shape_correct() {
        for tag in TypeTag::ALL {
            for value in samples() {
                let out = coerce(&value, tag);
                assert!(
                    has_canonical_shape(&out, tag),
                    "{value:?} coerced to {tag} gave {out:?}"
                );
            }
        }
    }

    #[test]
    fn coercion_is_idempotent() {
        for tag in TypeTag::ALL {
            for value in samples() {
                let once = coerce(&value, tag);
                assert_eq!(coerce(&once, tag), once, "{value:?} as {tag}");
            }
        }
    }

    #[test]
    fn null_coerces_to_registry_default() {
        for tag in TypeTag::ALL {
            let out = coerce(&Value::None, tag);
            if tag.is_passthrough() {
                assert_eq!(out, Value::None);
            } else if tag.is_date_family() {
                assert!(matches!(out, Value::Date(_)));
            } else {
                assert_eq!(out, default_value_for(tag), "{tag}");
            }
        }
    }

    #[test]
    fn boolean_text_mapping() {
        assert_eq!(coerce(&"true".into(), TypeTag::Boolean), Value::Bool(true));
        assert_eq!(coerce(&"1".into(), TypeTag::Boolean), Value::Bool(true));
        assert_eq!(coerce(&"yes".into(), TypeTag::Boolean), Value::Bool(true));
        assert_eq!(coerce(&"no".into(), TypeTag::Boolean), Value::Bool(false));
        assert_eq!(coerce(&Value::Number(2.0), TypeTag::Boolean), Value::Bool(true));
        assert_eq!(coerce(&Value::Number(0.0), TypeTag::Boolean), Value::Bool(false));
    }

    #[test]
    fn numbers_never_become_nan() {
        assert_eq!(coerce(&"abc".into(), TypeTag::Number), Value::Number(0.0));
        assert_eq!(coerce(&"NaN".into(), TypeTag::Number), Value::Number(0.0));
        assert_eq!(coerce(&"inf".into(), TypeTag::Decimal), Value::Number(0.0));
        assert_eq!(coerce(&" 42 ".into(), TypeTag::Number), Value::Number(42.0));
        assert_eq!(coerce(&"7.9".into(), TypeTag::Integer), Value::Number(7.0));
        assert_eq!(coerce(&Value::Bool(true), TypeTag::Number), Value::Number(1.0));
    }

    #[test]
    fn strings_render_values() {
        assert_eq!(coerce(&Value::Number(42.0), TypeTag::String), Value::Text("42".into()));
        assert_eq!(coerce(&Value::Bool(false), TypeTag::String), Value::Text("false".into()));
        assert_eq!(
            coerce(&Value::from(json!({"a": [1]})), TypeTag::String),
            Value::Text("{\"a\":[1]}".into())
        );
    }

    #[test]
    fn dates_parse_or_fall_back_to_now() {
        let parsed = coerce(&"2025-01-10".into(), TypeTag::Date);
        assert_eq!(
            parsed,
            Value::Date(Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap())
        );
        let before = Utc::now();
        let Value::Date(fallback) = coerce(&"garbage".into(), TypeTag::DateTime) else {
            panic!("expected date");
        };
        assert!(fallback >= before);
        assert!(parse_date("2025-01-10T08:30").is_some());
        assert!(parse_date("2025-01-10T08:30:00+02:00").is_some());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn containers_keep_matching_shapes_only() {
        let list = Value::from(json!([1, 2]));
        assert_eq!(coerce(&list, TypeTag::Array), list);
        assert_eq!(coerce(&list, TypeTag::Object), Value::object());
        assert_eq!(coerce(&"x".into(), TypeTag::Array), Value::List(Vec::new()));
    }

    #[test]
    fn passthrough_tags_keep_input() {
        let value = Value::from(json!({"any": true}));
        assert_eq!(coerce(&value, TypeTag::Mixed), value);
        assert_eq!(coerce(&"abc".into(), TypeTag::ObjectId), Value::Text("abc".into()));
    }

    #[test]
    fn mixed_input_falls_back_to_text() {
        assert_eq!(parse_mixed_input("{bad json"), Value::Text("{bad json".into()));
        assert_eq!(parse_mixed_input("{\"a\":1}"), Value::from(json!({"a": 1})));
        assert_eq!(parse_mixed_input("12"), Value::Number(12.0));
    }

    #[test]
    fn container_input_reads_json() {
        assert_eq!(coerce_input("[1,2]", TypeTag::Array), Value::from(json!([1, 2])));
        assert_eq!(coerce_input("oops", TypeTag::Array), Value::List(Vec::new()));
        assert_eq!(coerce_input("42", TypeTag::Number), Value::Number(42.0));
    }
}
