use crate::core::type_tag::TypeTag;
use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::terminal::KeyEvent;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Controls how strictly a widget validates its current value.
///
/// - `Live`: called on every keystroke; partial input is acceptable, such as
///   a date that is still being typed.
/// - `Submit`: called before the value is committed; it must be complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Live,
    Submit,
}

// ---------------------------------------------------------------------------
// InteractionResult
// ---------------------------------------------------------------------------

/// Requests a widget hands back to its host after a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetAction {
    /// The input wants to be submitted (plain Enter on a single-line input).
    InputDone,
    /// The edited value changed and has been sent to the change listener.
    ValueChanged,
    /// Move focus to the first input of the new-field form of `container`.
    FocusDraft { container: ValuePath },
    EditCommitted { path: ValuePath },
    EditCancelled { path: ValuePath },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionResult {
    pub handled: bool,
    pub actions: Vec<WidgetAction>,
}

impl InteractionResult {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            actions: Vec::new(),
        }
    }

    pub fn with_action(action: WidgetAction) -> Self {
        Self {
            handled: true,
            actions: vec![action],
        }
    }

    pub fn input_done() -> Self {
        Self::with_action(WidgetAction::InputDone)
    }

    pub fn push(mut self, action: WidgetAction) -> Self {
        self.handled = true;
        self.actions.push(action);
        self
    }

    pub fn merge(&mut self, other: Self) {
        self.handled |= other.handled;
        self.actions.extend(other.actions);
    }

    pub fn has(&self, action: &WidgetAction) -> bool {
        self.actions.contains(action)
    }
}

// ---------------------------------------------------------------------------
// ScalarInput: one editing surface per scalar tag
// ---------------------------------------------------------------------------

pub trait ScalarInput: Send {
    fn tag(&self) -> TypeTag;

    /// Current value, already coerced to `tag()`.
    fn value(&self) -> Value;

    fn set_value(&mut self, value: Value);

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult;

    fn validate(&self, _mode: ValidationMode) -> Result<(), String> {
        Ok(())
    }

    /// Text shown in the row while editing.
    fn display(&self) -> String;
}
