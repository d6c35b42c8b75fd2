use std::fmt;

use indexmap::IndexMap;

use crate::core::type_tag::{TypeTag, infer_tag};
use crate::core::value::Value;

const LEGACY_INDEX_PREFIX: &str = "array-";

/// Position of a child inside its container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    Named(String),
    Indexed(usize),
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Named(name) => f.write_str(name),
            FieldKey::Indexed(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for FieldKey {
    fn from(value: &str) -> Self {
        FieldKey::Named(value.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(value: String) -> Self {
        FieldKey::Named(value)
    }
}

impl From<usize> for FieldKey {
    fn from(value: usize) -> Self {
        FieldKey::Indexed(value)
    }
}

/// Declared tag per child of one container.
///
/// Indexed entries always mirror the list they describe: removing index `i`
/// renumbers every later entry down by one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeMap {
    entries: IndexMap<FieldKey, TypeTag>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map by inferring the tag of every direct child.
    pub fn infer_for(value: &Value) -> Self {
        let mut map = Self::new();
        match value {
            Value::Object(fields) => {
                for (key, child) in fields {
                    map.set(FieldKey::Named(key.clone()), infer_tag(child));
                }
            }
            Value::List(items) => {
                for (index, child) in items.iter().enumerate() {
                    map.set(FieldKey::Indexed(index), infer_tag(child));
                }
            }
            _ => {}
        }
        map
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &FieldKey) -> Option<TypeTag> {
        self.entries.get(key).copied()
    }

    /// Declared tag for `key`, or the tag inferred from `value`.
    pub fn tag_for(&self, key: &FieldKey, value: &Value) -> TypeTag {
        self.get(key).unwrap_or_else(|| infer_tag(value))
    }

    pub fn set(&mut self, key: FieldKey, tag: TypeTag) {
        self.entries.insert(key, tag);
    }

    pub fn remove(&mut self, key: &FieldKey) -> Option<TypeTag> {
        self.entries.shift_remove(key)
    }

    /// Moves the entry for `from` to `to`, replacing any entry already at `to`.
    pub fn rename(&mut self, from: &FieldKey, to: FieldKey) {
        if *from == to {
            return;
        }
        if let Some(tag) = self.entries.shift_remove(from) {
            self.entries.insert(to, tag);
        }
    }

    /// Records the tag of an element appended at `len`.
    pub fn push_index(&mut self, len: usize, tag: TypeTag) {
        self.set(FieldKey::Indexed(len), tag);
    }

    /// Drops `index` and shifts every later index down by one.
    pub fn remove_index(&mut self, index: usize) {
        self.entries = std::mem::take(&mut self.entries)
            .into_iter()
            .filter_map(|(key, tag)| match key {
                FieldKey::Indexed(i) if i == index => None,
                FieldKey::Indexed(i) if i > index => Some((FieldKey::Indexed(i - 1), tag)),
                other => Some((other, tag)),
            })
            .collect();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, TypeTag)> {
        self.entries.iter().map(|(key, tag)| (key, *tag))
    }

    /// Stored form: names as-is, indexes as `array-<n>`.
    pub fn to_legacy(&self) -> IndexMap<String, String> {
        self.entries
            .iter()
            .map(|(key, tag)| {
                let name = match key {
                    FieldKey::Named(name) => name.clone(),
                    FieldKey::Indexed(index) => format!("{LEGACY_INDEX_PREFIX}{index}"),
                };
                (name, tag.name().to_string())
            })
            .collect()
    }

    /// Reads the stored form back. Unknown tag names fall back to `String`.
    pub fn from_legacy<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut map = Self::new();
        for (key, tag) in entries {
            let field = key
                .strip_prefix(LEGACY_INDEX_PREFIX)
                .and_then(|rest| rest.parse::<usize>().ok())
                .map(FieldKey::Indexed)
                .unwrap_or_else(|| FieldKey::Named(key.to_string()));
            map.set(field, TypeTag::from_name_or_default(tag));
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldKey, TypeMap};
    use crate::core::type_tag::TypeTag;
    use crate::core::value::Value;
    use serde_json::json;

    fn indexed(tags: &[TypeTag]) -> TypeMap {
        let mut map = TypeMap::new();
        for (i, tag) in tags.iter().enumerate() {
            map.push_index(i, *tag);
        }
        map
    }

    #[test]
    fn remove_index_renumbers_later_entries() {
        let tags = [
            TypeTag::String,
            TypeTag::Number,
            TypeTag::Boolean,
            TypeTag::Date,
        ];
        for removed in 0..tags.len() {
            let mut map = indexed(&tags);
            map.remove_index(removed);

            let mut expected: Vec<TypeTag> = tags.to_vec();
            expected.remove(removed);
            assert_eq!(map.len(), tags.len() - 1);
            for (i, tag) in expected.iter().enumerate() {
                assert_eq!(map.get(&FieldKey::Indexed(i)), Some(*tag));
            }
            assert_eq!(map.get(&FieldKey::Indexed(tags.len() - 1)), None);
        }
    }

    #[test]
    fn rename_moves_entry() {
        let mut map = TypeMap::new();
        map.set("age".into(), TypeTag::Number);
        map.rename(&"age".into(), "years".into());
        assert_eq!(map.get(&"age".into()), None);
        assert_eq!(map.get(&"years".into()), Some(TypeTag::Number));
    }

    #[test]
    fn tag_for_prefers_declared_tag() {
        let mut map = TypeMap::new();
        map.set("id".into(), TypeTag::ObjectId);
        let text = Value::Text("64b7f0c2a1b2c3d4e5f60718".into());
        assert_eq!(map.tag_for(&"id".into(), &text), TypeTag::ObjectId);
        assert_eq!(map.tag_for(&"name".into(), &text), TypeTag::String);
    }

    #[test]
    fn infer_for_covers_objects_and_lists() {
        let map = TypeMap::infer_for(&Value::from(json!({"a": 1, "b": [true]})));
        assert_eq!(map.get(&"a".into()), Some(TypeTag::Number));
        assert_eq!(map.get(&"b".into()), Some(TypeTag::Array));

        let map = TypeMap::infer_for(&Value::from(json!(["x", false])));
        assert_eq!(map.get(&FieldKey::Indexed(1)), Some(TypeTag::Boolean));
    }

    #[test]
    fn legacy_form_uses_array_prefix() {
        let map = indexed(&[TypeTag::String, TypeTag::String]);
        let legacy = map.to_legacy();
        assert_eq!(legacy.get("array-1").map(String::as_str), Some("String"));

        let back = TypeMap::from_legacy(
            legacy.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        );
        assert_eq!(back, map);
    }
}
