use std::collections::HashMap;

use indexmap::IndexMap;

use crate::core::type_tag::TypeTag;

/// Supplies declared tags for named fields. Fields it does not know fall back
/// to shape inference.
pub trait SchemaProvider {
    fn type_tag(&self, field: &str) -> Option<TypeTag>;
}

impl SchemaProvider for HashMap<String, TypeTag> {
    fn type_tag(&self, field: &str) -> Option<TypeTag> {
        self.get(field).copied()
    }
}

impl SchemaProvider for IndexMap<String, TypeTag> {
    fn type_tag(&self, field: &str) -> Option<TypeTag> {
        self.get(field).copied()
    }
}

impl<F> SchemaProvider for F
where
    F: Fn(&str) -> Option<TypeTag>,
{
    fn type_tag(&self, field: &str) -> Option<TypeTag> {
        self(field)
    }
}
