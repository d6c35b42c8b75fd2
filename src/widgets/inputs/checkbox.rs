use crate::core::coerce::coerce;
use crate::core::type_tag::TypeTag;
use crate::core::value::Value;
use crate::terminal::{KeyCode, KeyEvent};
use crate::widgets::traits::{InteractionResult, ScalarInput};

pub struct CheckboxInput {
    checked: bool,
}

impl CheckboxInput {
    pub fn new() -> Self {
        Self { checked: false }
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }
}

impl Default for CheckboxInput {
    fn default() -> Self {
        Self::new()
    }
}

impl ScalarInput for CheckboxInput {
    fn tag(&self) -> TypeTag {
        TypeTag::Boolean
    }

    fn value(&self) -> Value {
        Value::Bool(self.checked)
    }

    fn set_value(&mut self, value: Value) {
        self.checked = coerce(&value, TypeTag::Boolean)
            .as_bool()
            .unwrap_or_default();
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        match key.code {
            KeyCode::Char(' ') => {
                self.checked = !self.checked;
                InteractionResult::handled()
            }
            KeyCode::Char('y') => {
                self.checked = true;
                InteractionResult::handled()
            }
            KeyCode::Char('n') => {
                self.checked = false;
                InteractionResult::handled()
            }
            KeyCode::Enter if key.modifiers.is_empty() => InteractionResult::input_done(),
            _ => InteractionResult::ignored(),
        }
    }

    fn display(&self) -> String {
        if self.checked { "[✓]" } else { "[✗]" }.to_string()
    }
}
