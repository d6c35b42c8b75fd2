use super::text_edit::TextBuffer;
use crate::core::scalars::ObjectId;
use crate::core::type_tag::TypeTag;
use crate::core::value::Value;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use crate::widgets::traits::{InteractionResult, ScalarInput, ValidationMode};

const OBJECT_ID_LEN: usize = 24;

/// Hex identifier input. Ctrl+G fills in a freshly generated id.
pub struct ObjectIdInput {
    buffer: TextBuffer,
}

impl ObjectIdInput {
    pub fn new() -> Self {
        Self {
            buffer: TextBuffer::default(),
        }
    }
}

impl Default for ObjectIdInput {
    fn default() -> Self {
        Self::new()
    }
}

impl ScalarInput for ObjectIdInput {
    fn tag(&self) -> TypeTag {
        TypeTag::ObjectId
    }

    fn value(&self) -> Value {
        Value::Text(self.buffer.text().to_string())
    }

    fn set_value(&mut self, value: Value) {
        self.buffer
            .set_text(value.to_text_scalar().unwrap_or_default());
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('g') {
            self.buffer.set_text(ObjectId::generate().to_string());
            return InteractionResult::handled();
        }
        if key.code == KeyCode::Enter && key.modifiers.is_empty() {
            return InteractionResult::input_done();
        }
        let full = self.buffer.text().chars().count() >= OBJECT_ID_LEN;
        if self
            .buffer
            .apply_key(key, |ch| !full && ch.is_ascii_hexdigit())
        {
            InteractionResult::handled()
        } else {
            InteractionResult::ignored()
        }
    }

    fn validate(&self, mode: ValidationMode) -> Result<(), String> {
        let text = self.buffer.text();
        if mode == ValidationMode::Live || text.is_empty() || ObjectId::is_valid(text) {
            return Ok(());
        }
        Err("Object id must be 24 hex characters".to_string())
    }

    fn display(&self) -> String {
        self.buffer.text().to_string()
    }
}
