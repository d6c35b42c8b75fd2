//! Nested tree editor over a [`Value`].
//!
//! The editor keeps a private copy of the caller's value and hands every new
//! version to the change listener. Display state lives beside it, keyed by
//! [`ValuePath`]:
//!
//! - the expanded set,
//! - one [`TypeMap`] per container, inferred once when the container is first
//!   seen,
//! - one pending [`FieldDraft`] per container,
//! - at most one edit session per container.
//!
//! Operations that do not apply to the addressed node are ignored and logged
//! at `debug`.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::core::coerce::coerce;
use crate::core::config::{DEFAULT_MAX_DEPTH, EditorConfig};
use crate::core::schema::SchemaProvider;
use crate::core::type_map::{FieldKey, TypeMap};
use crate::core::type_tag::TypeTag;
use crate::core::validation::FieldRule;
use crate::core::value::Value;
use crate::core::value_path::{PathSegment, ValuePath};
use crate::terminal::{KeyChord, KeyCode, KeyEvent};
use crate::widgets::inputs::input_for;
use crate::widgets::traits::{InteractionResult, ScalarInput, ValidationMode, WidgetAction};
use crate::widgets::validators::{Validator, for_rule, run_validators};

pub type ChangeListener = Box<dyn FnMut(&Value) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Collapsed,
    Expanded,
    Editing,
}

/// One visible row of the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueNode {
    pub key: FieldKey,
    pub tag: TypeTag,
    pub path: ValuePath,
    pub depth: usize,
    pub state: NodeState,
    /// Non-empty container above the depth ceiling.
    pub expandable: bool,
    /// Non-empty container at or past the depth ceiling, shown as a leaf.
    pub flattened: bool,
    pub value: Value,
    pub summary: String,
}

/// Name, tag and value of a row while it is being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingCopy {
    pub name: String,
    pub tag: TypeTag,
    pub value: Value,
}

/// Pending "new field" form of one container. `name` is ignored for lists.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDraft {
    pub name: String,
    pub tag: TypeTag,
    pub value: Value,
}

impl FieldDraft {
    pub fn with_tag(tag: TypeTag) -> Self {
        Self {
            name: String::new(),
            tag,
            value: Value::Text(String::new()),
        }
    }
}

impl Default for FieldDraft {
    fn default() -> Self {
        Self::with_tag(TypeTag::String)
    }
}

struct EditSession {
    child: FieldKey,
    copy: WorkingCopy,
    input: Option<Box<dyn ScalarInput>>,
    validators: Vec<Validator>,
    error: Option<String>,
}

impl EditSession {
    fn new(child: FieldKey, copy: WorkingCopy, validators: Vec<Validator>) -> Self {
        let input = scalar_input(copy.tag, &copy.value);
        Self {
            child,
            copy,
            input,
            validators,
            error: None,
        }
    }

    /// Submit check: the scalar input first, then the field's rules.
    fn check(&self) -> Result<(), String> {
        if let Some(input) = self.input.as_ref() {
            input.validate(ValidationMode::Submit)?;
        }
        run_validators(&self.validators, &self.copy.value)
    }
}

fn scalar_input(tag: TypeTag, value: &Value) -> Option<Box<dyn ScalarInput>> {
    let mut input = input_for(tag)?;
    input.set_value(value.clone());
    Some(input)
}

pub struct ObjectEditor {
    tag: TypeTag,
    value: Value,
    max_depth: usize,
    commit_chord: KeyChord,
    schema: Option<Box<dyn SchemaProvider + Send>>,
    rules: Vec<FieldRule>,
    on_change: Option<ChangeListener>,
    expanded: HashSet<ValuePath>,
    type_maps: HashMap<ValuePath, TypeMap>,
    drafts: HashMap<ValuePath, FieldDraft>,
    edits: HashMap<ValuePath, EditSession>,
    cursor: usize,
}

impl ObjectEditor {
    pub fn new(value: Value, tag: TypeTag) -> Self {
        let mut this = Self {
            tag,
            value: coerce(&value, tag),
            max_depth: DEFAULT_MAX_DEPTH,
            commit_chord: KeyChord::default(),
            schema: None,
            rules: Vec::new(),
            on_change: None,
            expanded: HashSet::new(),
            type_maps: HashMap::new(),
            drafts: HashMap::new(),
            edits: HashMap::new(),
            cursor: 0,
        };
        this.reindex();
        this
    }

    /// Opens `path` and every container above it.
    pub fn with_open(mut self, path: ValuePath) -> Self {
        let mut current = Some(path);
        while let Some(path) = current {
            if !path.is_root() && self.is_expandable(&path) {
                self.expanded.insert(path.clone());
            }
            current = path.parent();
        }
        self
    }

    pub fn with_schema(mut self, schema: impl SchemaProvider + Send + 'static) -> Self {
        self.schema = Some(Box::new(schema));
        self.apply_schema();
        self
    }

    /// Applies depth, chord and the field rules checked when a root field
    /// edit is submitted from the keyboard.
    pub fn with_config(mut self, config: &EditorConfig) -> Self {
        self.commit_chord = config.commit_and_continue.clone();
        self.rules = config.validation.fields.clone();
        self.with_max_depth(config.max_depth)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self.expanded.retain(|path| path.depth() < self.max_depth);
        self.reindex();
        self
    }

    pub fn on_change(mut self, listener: impl FnMut(&Value) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(listener));
        self
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Replaces the edited value with one from the caller. Display state is
    /// reset and nothing is reported back.
    pub fn set_value(&mut self, value: Value) {
        self.value = coerce(&value, self.tag);
        self.expanded.clear();
        self.type_maps.clear();
        self.drafts.clear();
        self.edits.clear();
        self.cursor = 0;
        self.reindex();
    }

    pub fn type_map(&self, container: &ValuePath) -> Option<&TypeMap> {
        self.type_maps.get(container)
    }

    /// Tag of the node at `path`: declared in its parent's map, else inferred.
    pub fn tag_at(&self, path: &ValuePath) -> Option<TypeTag> {
        if path.is_root() {
            return Some(self.tag);
        }
        let value = self.value.get_path(path)?;
        let parent = path.parent()?;
        let key = field_key(path.last()?);
        Some(match self.type_maps.get(&parent) {
            Some(map) => map.tag_for(&key, value),
            None => crate::core::type_tag::infer_tag(value),
        })
    }

    pub fn is_editing(&self, path: &ValuePath) -> bool {
        self.session_for(path).is_some()
    }

    pub fn working_copy(&self, path: &ValuePath) -> Option<&WorkingCopy> {
        self.session_for(path).map(|session| &session.copy)
    }

    /// Message from the last rejected key-driven commit of `path`.
    pub fn edit_error(&self, path: &ValuePath) -> Option<&str> {
        self.session_for(path)
            .and_then(|session| session.error.as_deref())
    }

    pub fn draft(&self, container: &ValuePath) -> FieldDraft {
        self.drafts.get(container).cloned().unwrap_or_default()
    }

    fn session_for(&self, path: &ValuePath) -> Option<&EditSession> {
        let parent = path.parent()?;
        let key = field_key(path.last()?);
        self.edits
            .get(&parent)
            .filter(|session| session.child == key)
    }

    fn session_for_mut(&mut self, path: &ValuePath) -> Option<&mut EditSession> {
        let parent = path.parent()?;
        let key = field_key(path.last()?);
        self.edits
            .get_mut(&parent)
            .filter(|session| session.child == key)
    }

    fn emit_change(&mut self) {
        if let Some(listener) = self.on_change.as_mut() {
            listener(&self.value);
        }
    }
}

pub(crate) fn field_key(segment: &PathSegment) -> FieldKey {
    match segment {
        PathSegment::Key(name) => FieldKey::Named(name.clone()),
        PathSegment::Index(index) => FieldKey::Indexed(*index),
    }
}

mod actions;
mod interaction;
mod model;
