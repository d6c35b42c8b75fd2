pub mod checkbox;
pub mod date;
pub mod number;
pub mod object_id;
pub mod text;
pub mod text_edit;
pub mod time;

use crate::core::type_tag::TypeTag;
use crate::widgets::traits::ScalarInput;

use checkbox::CheckboxInput;
use date::DateInput;
use number::NumberInput;
use object_id::ObjectIdInput;
use text::TextInput;
use time::{TimeInput, TimeRangeInput};

/// Editing surface for a scalar tag. Containers have no single input and
/// return `None`; Mixed and Custom values are typed as free text.
pub fn input_for(tag: TypeTag) -> Option<Box<dyn ScalarInput>> {
    let input: Box<dyn ScalarInput> = match tag {
        TypeTag::Object | TypeTag::Array => return None,
        TypeTag::String | TypeTag::Mixed | TypeTag::Custom => Box::new(TextInput::new(tag)),
        TypeTag::Number | TypeTag::Integer | TypeTag::Decimal => Box::new(NumberInput::new(tag)),
        TypeTag::Boolean => Box::new(CheckboxInput::new()),
        TypeTag::Date | TypeTag::DateTime | TypeTag::DateTimeLocal => Box::new(DateInput::new(tag)),
        TypeTag::Time => Box::new(TimeInput::new()),
        TypeTag::TimeRange => Box::new(TimeRangeInput::new()),
        TypeTag::ObjectId => Box::new(ObjectIdInput::new()),
    };
    Some(input)
}

#[cfg(test)]
mod tests {
    use super::input_for;
    use crate::core::type_tag::TypeTag;

    #[test]
    fn every_scalar_tag_has_an_input_with_that_tag() {
        for tag in TypeTag::ALL {
            match input_for(tag) {
                Some(input) => assert_eq!(input.tag(), tag),
                None => assert!(tag.is_container()),
            }
        }
    }
}
