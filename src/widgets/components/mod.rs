pub mod object_editor;
pub mod typed_array;
