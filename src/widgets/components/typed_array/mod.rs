use tracing::debug;

use crate::core::coerce::{coerce, coerce_input};
use crate::core::config::EditorConfig;
use crate::core::type_map::TypeMap;
use crate::core::type_tag::TypeTag;
use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::terminal::{KeyChord, KeyCode, KeyEvent};
use crate::widgets::components::object_editor::ChangeListener;
use crate::widgets::inputs::text_edit::TextBuffer;
use crate::widgets::traits::{InteractionResult, WidgetAction};

/// List whose elements all share one declared tag. Every value is coerced to
/// that tag on the way in; there is no per-element inference.
pub struct TypedArrayEditor {
    element_tag: TypeTag,
    items: Vec<Value>,
    draft: TextBuffer,
    commit_chord: KeyChord,
    on_change: Option<ChangeListener>,
}

impl TypedArrayEditor {
    pub fn new(element_tag: TypeTag) -> Self {
        Self {
            element_tag,
            items: Vec::new(),
            draft: TextBuffer::default(),
            commit_chord: KeyChord::default(),
            on_change: None,
        }
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = Value>) -> Self {
        self.items = items
            .into_iter()
            .map(|item| coerce(&item, self.element_tag))
            .collect();
        self
    }

    pub fn with_config(mut self, config: &EditorConfig) -> Self {
        self.commit_chord = config.commit_and_continue.clone();
        self
    }

    pub fn on_change(mut self, listener: impl FnMut(&Value) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(listener));
        self
    }

    pub fn element_tag(&self) -> TypeTag {
        self.element_tag
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn value(&self) -> Value {
        Value::List(self.items.clone())
    }

    /// Declared tags in the stored per-index form.
    pub fn type_map(&self) -> TypeMap {
        let mut map = TypeMap::new();
        for index in 0..self.items.len() {
            map.push_index(index, self.element_tag);
        }
        map
    }

    pub fn add_item(&mut self, value: Value) {
        self.items.push(coerce(&value, self.element_tag));
        self.emit_change();
    }

    /// Appends typed text. Mixed elements are read as JSON and fall back to
    /// the literal text when it does not parse.
    pub fn add_text(&mut self, raw: &str) {
        self.items.push(coerce_input(raw, self.element_tag));
        self.emit_change();
    }

    pub fn remove_item(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            debug!(index, len = self.items.len(), "remove_item ignored, out of range");
            return false;
        }
        self.items.remove(index);
        self.emit_change();
        true
    }

    pub fn update_item(&mut self, index: usize, value: Value) -> bool {
        let tag = self.element_tag;
        let Some(slot) = self.items.get_mut(index) else {
            debug!(index, "update_item ignored, out of range");
            return false;
        };
        *slot = coerce(&value, tag);
        self.emit_change();
        true
    }

    pub fn draft(&self) -> &str {
        self.draft.text()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft.set_text(text);
    }

    /// Enter or the commit-and-continue chord appends the draft text, clears
    /// it and asks the host to keep focus on the draft input.
    pub fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        let submit = self.commit_chord.matches(key)
            || (key.code == KeyCode::Enter && key.modifiers.is_empty());
        if submit {
            let raw = self.draft.text().to_string();
            self.add_text(&raw);
            self.draft.clear();
            return InteractionResult::with_action(WidgetAction::ValueChanged).push(
                WidgetAction::FocusDraft {
                    container: ValuePath::root(),
                },
            );
        }
        if self.draft.apply_key(key, |_| true) {
            InteractionResult::handled()
        } else {
            InteractionResult::ignored()
        }
    }

    fn emit_change(&mut self) {
        let value = Value::List(self.items.clone());
        if let Some(listener) = self.on_change.as_mut() {
            listener(&value);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::TypedArrayEditor;
    use crate::core::type_map::FieldKey;
    use crate::core::type_tag::TypeTag;
    use crate::core::value::Value;
    use crate::core::value_path::ValuePath;
    use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
    use crate::widgets::traits::WidgetAction;

    #[test]
    fn mixed_bad_json_is_stored_as_text() {
        let mut editor = TypedArrayEditor::new(TypeTag::Mixed);
        editor.add_text("{bad json");
        editor.add_text("[1, 2]");
        assert_eq!(
            editor.items(),
            &[
                Value::Text("{bad json".into()),
                Value::List(vec![Value::Number(1.0), Value::Number(2.0)]),
            ]
        );
    }

    #[test]
    fn every_element_is_forced_to_the_declared_tag() {
        let mut editor = TypedArrayEditor::new(TypeTag::Number)
            .with_items([Value::Text("3".into()), Value::Bool(true)]);
        editor.add_text("abc");
        editor.add_item(Value::Text("2.5".into()));
        assert_eq!(
            editor.value(),
            Value::List(vec![
                Value::Number(3.0),
                Value::Number(1.0),
                Value::Number(0.0),
                Value::Number(2.5),
            ])
        );
    }

    #[test]
    fn update_and_remove_respect_bounds() {
        let seen = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&seen);
        let mut editor = TypedArrayEditor::new(TypeTag::Boolean)
            .with_items([Value::Bool(false), Value::Bool(false)])
            .on_change(move |_| *counter.lock().expect("lock") += 1);

        assert!(editor.update_item(1, Value::Text("yes".into())));
        assert_eq!(editor.items()[1], Value::Bool(true));
        assert!(!editor.update_item(5, Value::Bool(true)));
        assert!(editor.remove_item(0));
        assert!(!editor.remove_item(1));
        assert_eq!(editor.items(), &[Value::Bool(true)]);
        assert_eq!(*seen.lock().expect("lock"), 2);

        let map = editor.type_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&FieldKey::Indexed(0)), Some(TypeTag::Boolean));
    }

    #[test]
    fn chord_appends_draft_and_clears_it() {
        let mut editor = TypedArrayEditor::new(TypeTag::Integer);
        for ch in "41.7".chars() {
            editor.on_key(KeyEvent::plain(KeyCode::Char(ch)));
        }
        let result = editor.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL));
        assert!(result.has(&WidgetAction::FocusDraft {
            container: ValuePath::root()
        }));
        assert_eq!(editor.items(), &[Value::Number(41.0)]);
        assert_eq!(editor.draft(), "");
    }
}
