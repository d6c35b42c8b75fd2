use chrono::{DateTime, SecondsFormat, Utc};

use super::text_edit::TextBuffer;
use crate::core::coerce::{coerce, parse_date};
use crate::core::type_tag::TypeTag;
use crate::core::value::Value;
use crate::terminal::{KeyCode, KeyEvent};
use crate::widgets::traits::{InteractionResult, ScalarInput, ValidationMode};

/// Date, date-time and local date-time input. Text that does not parse yet is
/// kept while typing; the value falls back to now until it does.
pub struct DateInput {
    tag: TypeTag,
    buffer: TextBuffer,
}

impl DateInput {
    pub fn new(tag: TypeTag) -> Self {
        Self {
            tag,
            buffer: TextBuffer::default(),
        }
    }


    fn hint(&self) -> &'static str {
        match self.tag {
            TypeTag::Date => "YYYY-MM-DD",
            TypeTag::DateTimeLocal => "YYYY-MM-DDTHH:MM",
            _ => "YYYY-MM-DDTHH:MM:SSZ",
        }
    }

    pub fn set_date(&mut self, date: DateTime<Utc>) {
        let text = match self.tag {
            TypeTag::Date => date.format("%Y-%m-%d").to_string(),
            TypeTag::DateTimeLocal => date.format("%Y-%m-%dT%H:%M").to_string(),
            _ => date.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        self.buffer.set_text(text);
    }
}

impl ScalarInput for DateInput {
    fn tag(&self) -> TypeTag {
        self.tag
    }

    fn value(&self) -> Value {
        coerce(&Value::Text(self.buffer.text().to_string()), self.tag)
    }

    fn set_value(&mut self, value: Value) {
        match coerce(&value, self.tag) {
            Value::Date(date) => self.set_date(date),
            _ => self.buffer.clear(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        match key.code {
            KeyCode::Char('t') if self.buffer.text().is_empty() => {
                self.set_date(Utc::now());
                InteractionResult::handled()
            }
            KeyCode::Enter if key.modifiers.is_empty() => InteractionResult::input_done(),
            _ => {
                let accepted = self.buffer.apply_key(key, |ch| {
                    ch.is_ascii_digit() || matches!(ch, '-' | ':' | 'T' | ' ' | '.' | '+' | 'Z')
                });
                if accepted {
                    InteractionResult::handled()
                } else {
                    InteractionResult::ignored()
                }
            }
        }
    }

    fn validate(&self, mode: ValidationMode) -> Result<(), String> {
        if mode == ValidationMode::Live || parse_date(self.buffer.text()).is_some() {
            return Ok(());
        }
        Err(format!("Enter a date as {}", self.hint()))
    }

    fn display(&self) -> String {
        self.buffer.text().to_string()
    }
}
