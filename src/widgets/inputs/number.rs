use super::text_edit::TextBuffer;
use crate::core::coerce::coerce;
use crate::core::type_tag::TypeTag;
use crate::core::value::{Value, format_number};
use crate::terminal::{KeyCode, KeyEvent};
use crate::widgets::traits::{InteractionResult, ScalarInput, ValidationMode};

/// Numeric input for Number, Integer and Decimal. Up/Down step the value.
pub struct NumberInput {
    tag: TypeTag,
    buffer: TextBuffer,
    step: f64,
}

impl NumberInput {
    pub fn new(tag: TypeTag) -> Self {
        Self {
            tag,
            buffer: TextBuffer::default(),
            step: 1.0,
        }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    fn number(&self) -> f64 {
        self.value().as_number().unwrap_or_default()
    }

    fn step_by(&mut self, delta: f64) {
        let next = coerce(&Value::Number(self.number() + delta), self.tag);
        self.buffer
            .set_text(format_number(next.as_number().unwrap_or_default()));
    }
}

impl ScalarInput for NumberInput {
    fn tag(&self) -> TypeTag {
        self.tag
    }

    fn value(&self) -> Value {
        coerce(&Value::Text(self.buffer.text().to_string()), self.tag)
    }

    fn set_value(&mut self, value: Value) {
        let n = coerce(&value, self.tag).as_number().unwrap_or_default();
        self.buffer.set_text(format_number(n));
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        match key.code {
            KeyCode::Up => {
                self.step_by(self.step);
                InteractionResult::handled()
            }
            KeyCode::Down => {
                self.step_by(-self.step);
                InteractionResult::handled()
            }
            KeyCode::Enter if key.modifiers.is_empty() => InteractionResult::input_done(),
            _ => {
                let tag = self.tag;
                if self.buffer.apply_key(key, |ch| accepts(tag, ch)) {
                    InteractionResult::handled()
                } else {
                    InteractionResult::ignored()
                }
            }
        }
    }

    fn validate(&self, mode: ValidationMode) -> Result<(), String> {
        let text = self.buffer.text().trim();
        if mode == ValidationMode::Live || text.is_empty() {
            return Ok(());
        }
        match text.parse::<f64>() {
            Ok(n) if !n.is_finite() => Err("Enter a valid number".to_string()),
            Ok(n) if self.tag == TypeTag::Integer && n.fract() != 0.0 => {
                Err("Enter a whole number".to_string())
            }
            Ok(_) => Ok(()),
            Err(_) => Err("Enter a valid number".to_string()),
        }
    }

    fn display(&self) -> String {
        self.buffer.text().to_string()
    }
}

fn accepts(tag: TypeTag, ch: char) -> bool {
    match tag {
        TypeTag::Integer => ch.is_ascii_digit() || matches!(ch, '-' | '+'),
        _ => ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | 'e' | 'E'),
    }
}

#[cfg(test)]
mod tests {
    use super::NumberInput;
    use crate::core::type_tag::TypeTag;
    use crate::core::value::Value;
    use crate::terminal::{KeyCode, KeyEvent};
    use crate::widgets::traits::{ScalarInput, ValidationMode};

    fn type_text(input: &mut NumberInput, text: &str) {
        for ch in text.chars() {
            input.on_key(KeyEvent::plain(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn typed_digits_become_numbers() {
        let mut input = NumberInput::new(TypeTag::Number);
        type_text(&mut input, "4x2");
        assert_eq!(input.display(), "42");
        assert_eq!(input.value(), Value::Number(42.0));
    }

    #[test]
    fn integer_input_rejects_decimal_point() {
        let mut input = NumberInput::new(TypeTag::Integer);
        type_text(&mut input, "3.5");
        assert_eq!(input.display(), "35");
    }

    #[test]
    fn arrows_step_value() {
        let mut input = NumberInput::new(TypeTag::Decimal).with_step(0.5);
        input.set_value(Value::Number(1.0));
        input.on_key(KeyEvent::plain(KeyCode::Up));
        assert_eq!(input.value(), Value::Number(1.5));
        input.on_key(KeyEvent::plain(KeyCode::Down));
        input.on_key(KeyEvent::plain(KeyCode::Down));
        assert_eq!(input.value(), Value::Number(0.5));
    }

    #[test]
    fn submit_rejects_partial_numbers() {
        let mut input = NumberInput::new(TypeTag::Number);
        type_text(&mut input, "1e");
        assert_eq!(input.validate(ValidationMode::Live), Ok(()));
        assert!(input.validate(ValidationMode::Submit).is_err());
        assert_eq!(input.value(), Value::Number(0.0));
    }
}
