pub mod coerce;
pub mod config;
pub mod scalars;
pub mod schema;
pub mod type_map;
pub mod type_tag;
pub mod validation;
pub mod value;
pub mod value_path;

pub use coerce::{coerce, coerce_input, parse_date, parse_mixed_input};
pub use config::{ConfigError, EditorConfig};
pub use schema::SchemaProvider;
pub use type_map::{FieldKey, TypeMap};
pub use type_tag::{TypeTag, UnknownTypeTag, default_value_for, infer_tag};
pub use validation::{ValidationResult, ValidationSchema, validate};
pub use value::Value;
pub use value_path::{PathSegment, ValuePath, ValuePathParseError};
