pub mod core;
pub mod terminal;
pub mod widgets;

pub use crate::core::coerce;
pub use crate::core::config;
pub use crate::core::type_map;
pub use crate::core::type_tag;
pub use crate::core::validation;
pub use crate::core::value;
pub use crate::core::value_path;

pub use terminal::input_event;

pub use widgets::components::object_editor::{
    FieldDraft, NodeState, ObjectEditor, ValueNode, WorkingCopy,
};
pub use widgets::components::typed_array::TypedArrayEditor;
pub use widgets::inputs::input_for;
