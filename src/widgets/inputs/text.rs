use super::text_edit::TextBuffer;
use crate::core::coerce::coerce_input;
use crate::core::type_tag::TypeTag;
use crate::core::value::Value;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use crate::widgets::traits::{InteractionResult, ScalarInput, ValidationMode};
use crate::widgets::validators::{Validator, run_validators};

/// Free text input. Ctrl+T switches between a single line and a textarea in
/// which Enter inserts a newline.
pub struct TextInput {
    tag: TypeTag,
    buffer: TextBuffer,
    multiline: bool,
    validators: Vec<Validator>,
}

impl TextInput {
    pub fn new(tag: TypeTag) -> Self {
        Self {
            tag,
            buffer: TextBuffer::default(),
            multiline: false,
            validators: Vec::new(),
        }
    }

    pub fn with_multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    pub fn toggle_multiline(&mut self) {
        self.multiline = !self.multiline;
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }
}

impl ScalarInput for TextInput {
    fn tag(&self) -> TypeTag {
        self.tag
    }

    fn value(&self) -> Value {
        coerce_input(self.buffer.text(), self.tag)
    }

    fn set_value(&mut self, value: Value) {
        let text = match &value {
            Value::None => String::new(),
            Value::List(_) | Value::Object(_) => value.to_json().to_string(),
            other => other.to_text_scalar().unwrap_or_default(),
        };
        if text.contains('\n') {
            self.multiline = true;
        }
        self.buffer.set_text(text);
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
            self.toggle_multiline();
            return InteractionResult::handled();
        }
        if key.code == KeyCode::Enter && key.modifiers.is_empty() {
            if self.multiline {
                self.buffer.insert('\n');
                return InteractionResult::handled();
            }
            return InteractionResult::input_done();
        }
        if self.buffer.apply_key(key, |_| true) {
            InteractionResult::handled()
        } else {
            InteractionResult::ignored()
        }
    }

    fn validate(&self, mode: ValidationMode) -> Result<(), String> {
        if mode == ValidationMode::Live {
            return Ok(());
        }
        run_validators(&self.validators, &self.value())
    }

    fn display(&self) -> String {
        if self.multiline {
            self.buffer.text().to_string()
        } else {
            self.buffer.text().replace('\n', " ")
        }
    }
}
