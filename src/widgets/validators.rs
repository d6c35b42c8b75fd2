use crate::core::type_tag::TypeTag;
use crate::core::validation::{FieldRule, matches_tag};
use crate::core::value::Value;

pub type ValidationError = String;
pub type Validator = Box<dyn Fn(&Value) -> Result<(), ValidationError> + Send + Sync>;

/// Run a list of validators against `value`, returning the first error.
pub fn run_validators(validators: &[Validator], value: &Value) -> Result<(), ValidationError> {
    for validator in validators {
        validator(value)?;
    }
    Ok(())
}

pub fn required(message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &Value| {
        let blank = match value {
            Value::None => true,
            Value::Text(text) => text.trim().is_empty(),
            _ => false,
        };
        if blank { Err(message.clone()) } else { Ok(()) }
    })
}

pub fn max_length(max: usize, message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &Value| match value {
        Value::Text(text) if text.chars().count() > max => Err(message.clone()),
        _ => Ok(()),
    })
}

pub fn one_of(options: Vec<String>, field: impl Into<String>) -> Validator {
    let field = field.into();
    Box::new(move |value: &Value| {
        let shown = value.to_text_scalar().unwrap_or_else(|| value.summary());
        if options.contains(&shown) {
            Ok(())
        } else {
            Err(format!("{shown} is not a valid option for {field}"))
        }
    })
}

pub fn of_type(tag: TypeTag, message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &Value| {
        if matches_tag(value, tag) {
            Ok(())
        } else {
            Err(message.clone())
        }
    })
}

/// Validators for one declarative field rule, in rule order. Only the
/// required check looks at an empty value.
pub fn for_rule(rule: &FieldRule) -> Vec<Validator> {
    let mut validators = Vec::new();
    if rule.required {
        validators.push(required(rule.required_text()));
    }
    if let Some(max) = rule.max_length {
        validators.push(max_length(max, rule.max_length_text(max)));
    }
    if let Some(options) = &rule.allowed {
        validators.push(skip_none(one_of(options.clone(), rule.name.clone())));
    }
    if let Some(tag) = rule.tag {
        validators.push(skip_none(of_type(tag, rule.tag_text(tag))));
    }
    validators
}

fn skip_none(validator: Validator) -> Validator {
    Box::new(move |value: &Value| {
        if value.is_none() {
            Ok(())
        } else {
            validator(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{for_rule, max_length, of_type, one_of, required, run_validators};
    use crate::core::type_tag::TypeTag;
    use crate::core::validation::FieldRule;
    use crate::core::value::Value;

    #[test]
    fn first_failing_validator_wins() {
        let validators = vec![
            required("needed"),
            max_length(3, "too long"),
        ];
        assert_eq!(run_validators(&validators, &Value::Text(" ".into())), Err("needed".into()));
        assert_eq!(run_validators(&validators, &Value::Text("abcd".into())), Err("too long".into()));
        assert_eq!(run_validators(&validators, &Value::Text("abc".into())), Ok(()));
    }

    #[test]
    fn one_of_and_of_type() {
        let pick = one_of(vec!["a".into(), "b".into()], "letter");
        assert_eq!(
            pick(&Value::Text("c".into())),
            Err("c is not a valid option for letter".to_string())
        );
        let number = of_type(TypeTag::Number, "must be a number");
        assert!(number(&Value::Number(1.0)).is_ok());
        assert!(number(&Value::Text("1".into())).is_err());
    }

    #[test]
    fn field_rule_becomes_validators_with_its_messages() {
        let rule = FieldRule::new("key")
            .required("Key is required")
            .max_length(3, "Key must be 3 characters or less")
            .tag(TypeTag::String);
        let validators = for_rule(&rule);
        assert_eq!(validators.len(), 3);
        assert_eq!(
            run_validators(&validators, &Value::Text(String::new())),
            Err("Key is required".to_string())
        );
        assert_eq!(
            run_validators(&validators, &Value::Text("abcd".into())),
            Err("Key must be 3 characters or less".to_string())
        );
        assert_eq!(
            run_validators(&validators, &Value::Number(1.0)),
            Err("key must be of type String".to_string())
        );

        let optional = for_rule(&FieldRule::new("kind").allowed(["a", "b"]));
        assert_eq!(run_validators(&optional, &Value::None), Ok(()));
        assert!(run_validators(&optional, &Value::Text("c".into())).is_err());
    }
}
