//! Table-driven payload validation.
//!
//! Each payload type declares a static rule table and exposes its fields as
//! [`FieldValue`]s. A single engine walks the table in order and records the
//! first failing rule per field into a [`ValidationErrors`] map.

mod constraint;
mod errors;

pub use self::constraint::{Constraint, FieldValue, Predicate, Rule};
pub use self::errors::ValidationErrors;
use crate::utility::tracing_targets::TRACING_TARGET_VALIDATION;

/// A payload validated against a static rule table.
pub trait Validate {
    /// Rules evaluated in declaration order.
    const RULES: &'static [Rule];

    /// Returns the value of the named field.
    fn field(&self, name: &str) -> FieldValue<'_>;

    /// Evaluates [`Self::RULES`] against this payload.
    fn validate(&self) -> Result<(), ValidationErrors>
    where
        Self: Sized,
    {
        validate_rules(Self::RULES, |name| self.field(name))
    }
}

/// Evaluates a rule table, reading field values through `lookup`.
///
/// Fields are reported under their lowercased name with the message of the
/// first rule they fail; later rules for an already failed field are skipped.
pub fn validate_rules<'a, F>(rules: &[Rule], lookup: F) -> Result<(), ValidationErrors>
where
    F: Fn(&str) -> FieldValue<'a>,
{
    let mut errors = ValidationErrors::new();

    for rule in rules {
        let field = rule.field.to_lowercase();
        if errors.contains_key(&field) {
            continue;
        }

        let value = lookup(rule.field);
        if !rule.constraint.check(&value) {
            tracing::trace!(
                target: TRACING_TARGET_VALIDATION,
                field = %field,
                constraint = %rule.constraint.name(),
                "rule failed"
            );
            errors.insert(field.clone(), rule.constraint.message(&field));
        }
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        name: Option<String>,
        count: Option<i32>,
    }

    impl Validate for Sample {
        const RULES: &'static [Rule] = &[
            Rule::new("Name", Constraint::Required),
            Rule::new("Name", Constraint::MinLength(3)),
            Rule::new("count", Constraint::Gte(0.0)),
            Rule::new("count", Constraint::Custom {
                name: "even",
                check: |value| matches!(value, FieldValue::Integer(n) if n % 2 == 0),
            }),
        ];

        fn field(&self, name: &str) -> FieldValue<'_> {
            match name {
                "Name" => self.name.as_deref().into(),
                "count" => self.count.into(),
                _ => FieldValue::Missing,
            }
        }
    }

    #[test]
    fn valid_payload_passes() {
        let sample = Sample {
            name: Some("abc".into()),
            count: Some(2),
        };
        assert!(sample.validate().is_ok());
    }

    #[test]
    fn first_failing_rule_per_field() {
        let sample = Sample {
            name: None,
            count: Some(-1),
        };
        let errors = sample.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.message("name"), Some("name is required"));
        assert_eq!(
            errors.message("count"),
            Some("count must be greater than or equal to 0")
        );
    }

    #[test]
    fn custom_predicate_reports_invalid() {
        let sample = Sample {
            name: Some("abcd".into()),
            count: Some(3),
        };
        let errors = sample.validate().unwrap_err();
        assert_eq!(errors.message("count"), Some("count is invalid"));
    }
}
