use super::text_edit::TextBuffer;
use crate::core::coerce::coerce;
use crate::core::scalars::{TimeOfDay, TimeRange};
use crate::core::type_tag::TypeTag;
use crate::core::value::Value;
use crate::terminal::{KeyCode, KeyEvent};
use crate::widgets::traits::{InteractionResult, ScalarInput, ValidationMode};

fn accepts_time_char(ch: char) -> bool {
    ch.is_ascii_digit() || ch == ':'
}

fn check_time(text: &str) -> Result<(), String> {
    if text.trim().is_empty() || text.parse::<TimeOfDay>().is_ok() {
        Ok(())
    } else {
        Err("Enter a time as HH:MM".to_string())
    }
}

/// Time of day kept as `HH:MM` text.
pub struct TimeInput {
    buffer: TextBuffer,
}

impl TimeInput {
    pub fn new() -> Self {
        Self {
            buffer: TextBuffer::default(),
        }
    }
}

impl Default for TimeInput {
    fn default() -> Self {
        Self::new()
    }
}

impl ScalarInput for TimeInput {
    fn tag(&self) -> TypeTag {
        TypeTag::Time
    }

    fn value(&self) -> Value {
        Value::Text(self.buffer.text().to_string())
    }

    fn set_value(&mut self, value: Value) {
        let text = coerce(&value, TypeTag::Time)
            .as_text()
            .map(str::to_string)
            .unwrap_or_default();
        self.buffer.set_text(text);
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        if key.code == KeyCode::Enter && key.modifiers.is_empty() {
            return InteractionResult::input_done();
        }
        if self.buffer.apply_key(key, accepts_time_char) {
            InteractionResult::handled()
        } else {
            InteractionResult::ignored()
        }
    }

    fn validate(&self, mode: ValidationMode) -> Result<(), String> {
        if mode == ValidationMode::Live {
            return Ok(());
        }
        check_time(self.buffer.text())
    }

    fn display(&self) -> String {
        self.buffer.text().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSide {
    Start,
    End,
}

/// Start and end time pair; Tab and BackTab move between the sides.
pub struct TimeRangeInput {
    start: TextBuffer,
    end: TextBuffer,
    focus: RangeSide,
}

impl TimeRangeInput {
    pub fn new() -> Self {
        Self {
            start: TextBuffer::default(),
            end: TextBuffer::default(),
            focus: RangeSide::Start,
        }
    }

    pub fn focus(&self) -> RangeSide {
        self.focus
    }

    fn range(&self) -> TimeRange {
        TimeRange::new(self.start.text(), self.end.text())
    }
}

impl Default for TimeRangeInput {
    fn default() -> Self {
        Self::new()
    }
}

impl ScalarInput for TimeRangeInput {
    fn tag(&self) -> TypeTag {
        TypeTag::TimeRange
    }

    fn value(&self) -> Value {
        self.range().to_value()
    }

    fn set_value(&mut self, value: Value) {
        let range = TimeRange::from_value(&coerce(&value, TypeTag::TimeRange)).unwrap_or_default();
        self.start.set_text(range.start);
        self.end.set_text(range.end);
        self.focus = RangeSide::Start;
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        match key.code {
            KeyCode::Tab if self.focus == RangeSide::Start => {
                self.focus = RangeSide::End;
                InteractionResult::handled()
            }
            KeyCode::BackTab if self.focus == RangeSide::End => {
                self.focus = RangeSide::Start;
                InteractionResult::handled()
            }
            KeyCode::Enter if key.modifiers.is_empty() => InteractionResult::input_done(),
            _ => {
                let buffer = match self.focus {
                    RangeSide::Start => &mut self.start,
                    RangeSide::End => &mut self.end,
                };
                if buffer.apply_key(key, accepts_time_char) {
                    InteractionResult::handled()
                } else {
                    InteractionResult::ignored()
                }
            }
        }
    }

    fn validate(&self, mode: ValidationMode) -> Result<(), String> {
        if mode == ValidationMode::Live {
            return Ok(());
        }
        check_time(self.start.text())?;
        check_time(self.end.text())?;
        let range = self.range();
        if !range.start.is_empty() && !range.end.is_empty() && !range.is_ordered() {
            return Err("End time must be after start time".to_string());
        }
        Ok(())
    }

    fn display(&self) -> String {
        format!("{} – {}", self.start.text(), self.end.text())
    }
}

#[cfg(test)]
mod tests {
    use super::{RangeSide, TimeInput, TimeRangeInput};
    use crate::core::value::Value;
    use crate::terminal::{KeyCode, KeyEvent};
    use crate::widgets::traits::{ScalarInput, ValidationMode};
    use serde_json::json;

    fn type_text(input: &mut dyn ScalarInput, text: &str) {
        for ch in text.chars() {
            input.on_key(KeyEvent::plain(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn time_input_checks_format_on_submit() {
        let mut input = TimeInput::new();
        type_text(&mut input, "09a:30");
        assert_eq!(input.display(), "09:30");
        assert!(input.validate(ValidationMode::Submit).is_ok());
        input.set_value(Value::Text("27:00".into()));
        assert!(input.validate(ValidationMode::Submit).is_err());
    }

    #[test]
    fn range_input_fills_both_sides() {
        let mut input = TimeRangeInput::new();
        type_text(&mut input, "17:00");
        input.on_key(KeyEvent::plain(KeyCode::Tab));
        assert_eq!(input.focus(), RangeSide::End);
        type_text(&mut input, "08:00");
        assert_eq!(input.value(), Value::from(json!({"start": "17:00", "end": "08:00"})));
        assert_eq!(
            input.validate(ValidationMode::Submit),
            Err("End time must be after start time".to_string())
        );
    }
}
