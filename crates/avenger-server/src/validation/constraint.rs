use std::borrow::Cow;

use strum::{Display, IntoStaticStr};
use validator::ValidateEmail;

/// A value read from a payload field for rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// The field was absent or null.
    Missing,
    Text(&'a str),
    Integer(i64),
    Float(f64),
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Missing, Self::Text)
    }
}

impl From<Option<i32>> for FieldValue<'_> {
    fn from(value: Option<i32>) -> Self {
        value.map_or(Self::Missing, |n| Self::Integer(n.into()))
    }
}

impl From<Option<f64>> for FieldValue<'_> {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Float)
    }
}

impl FieldValue<'_> {
    fn as_number(&self) -> Option<f64> {
        match *self {
            Self::Integer(n) => Some(n as f64),
            Self::Float(n) => Some(n),
            _ => None,
        }
    }
}

/// Predicate used by [`Constraint::Custom`].
pub type Predicate = fn(&FieldValue<'_>) -> bool;

/// A single constraint kind with its parameter.
#[derive(Debug, Clone, Copy, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Constraint {
    /// Present and, for text, not blank.
    Required,
    Email,
    /// Minimum length in characters.
    MinLength(usize),
    /// Maximum length in characters.
    MaxLength(usize),
    Gte(f64),
    Lte(f64),
    Gt(f64),
    /// Text must equal one of the listed options.
    OneOf(&'static [&'static str]),
    /// Arbitrary named predicate; reported as invalid.
    Custom {
        name: &'static str,
        check: Predicate,
    },
}

impl Constraint {
    /// Evaluates the constraint.
    ///
    /// Every kind except [`Constraint::Required`] accepts a missing value, and a
    /// value of the wrong shape (such as a length bound on a number) fails.
    pub fn check(&self, value: &FieldValue<'_>) -> bool {
        if let Self::Required = self {
            return match value {
                FieldValue::Missing => false,
                FieldValue::Text(text) => !text.trim().is_empty(),
                _ => true,
            };
        }

        if let FieldValue::Missing = value {
            return true;
        }

        match (self, value) {
            (Self::Email, FieldValue::Text(text)) => text.validate_email(),
            (Self::MinLength(min), FieldValue::Text(text)) => text.chars().count() >= *min,
            (Self::MaxLength(max), FieldValue::Text(text)) => text.chars().count() <= *max,
            (Self::OneOf(options), FieldValue::Text(text)) => options.contains(text),
            (Self::Gte(bound), value) => value.as_number().is_some_and(|n| n >= *bound),
            (Self::Lte(bound), value) => value.as_number().is_some_and(|n| n <= *bound),
            (Self::Gt(bound), value) => value.as_number().is_some_and(|n| n > *bound),
            (Self::Custom { check, .. }, value) => check(value),
            _ => false,
        }
    }

    /// Renders the message reported when the constraint fails on `field`.
    pub fn message(&self, field: &str) -> String {
        match self {
            Self::Required => format!("{field} is required"),
            Self::Email => format!("{field} must be a valid email address"),
            Self::MinLength(n) => format!("{field} must be at least {n} characters"),
            Self::MaxLength(n) => format!("{field} must be at most {n} characters"),
            Self::Gte(n) => format!("{field} must be greater than or equal to {n}"),
            Self::Lte(n) => format!("{field} must be less than or equal to {n}"),
            Self::Gt(n) => format!("{field} must be greater than {n}"),
            Self::OneOf(options) => format!("{field} must be one of: {}", options.join(" ")),
            Self::Custom { .. } => format!("{field} is invalid"),
        }
    }

    /// Returns the constraint kind name, e.g. `min_length` or the custom predicate name.
    pub fn name(&self) -> Cow<'static, str> {
        match self {
            Self::Custom { name, .. } => Cow::Borrowed(name),
            other => Cow::Borrowed(other.into()),
        }
    }
}

/// One row of a rule table: a field and the constraint it must satisfy.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub field: &'static str,
    pub constraint: Constraint,
}

impl Rule {
    /// Creates a new rule.
    #[inline]
    pub const fn new(field: &'static str, constraint: Constraint) -> Self {
        Self { field, constraint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_missing_and_blank() {
        assert!(!Constraint::Required.check(&FieldValue::Missing));
        assert!(!Constraint::Required.check(&FieldValue::Text("   ")));
        assert!(Constraint::Required.check(&FieldValue::Text("x")));
        assert!(Constraint::Required.check(&FieldValue::Integer(0)));
    }

    #[test]
    fn optional_constraints_skip_missing() {
        assert!(Constraint::MaxLength(3).check(&FieldValue::Missing));
        assert!(Constraint::Gte(0.0).check(&FieldValue::Missing));
    }

    #[test]
    fn length_counts_characters() {
        assert!(Constraint::MaxLength(3).check(&FieldValue::Text("äöü")));
        assert!(!Constraint::MinLength(4).check(&FieldValue::Text("äöü")));
    }

    #[test]
    fn numeric_bounds() {
        assert!(Constraint::Gte(0.0).check(&FieldValue::Integer(0)));
        assert!(!Constraint::Gte(0.0).check(&FieldValue::Integer(-1)));
        assert!(!Constraint::Gt(0.0).check(&FieldValue::Integer(0)));
        assert!(Constraint::Lte(5.0).check(&FieldValue::Float(5.0)));
        assert!(!Constraint::Lte(5.0).check(&FieldValue::Float(5.1)));
    }

    #[test]
    fn shape_mismatch_fails() {
        assert!(!Constraint::MinLength(1).check(&FieldValue::Integer(10)));
        assert!(!Constraint::Gte(0.0).check(&FieldValue::Text("10")));
    }

    #[test]
    fn email_and_one_of() {
        assert!(Constraint::Email.check(&FieldValue::Text("a@example.com")));
        assert!(!Constraint::Email.check(&FieldValue::Text("not-an-email")));

        let status = Constraint::OneOf(&["active", "broken"]);
        assert!(status.check(&FieldValue::Text("broken")));
        assert!(!status.check(&FieldValue::Text("lost")));
    }

    #[test]
    fn messages() {
        assert_eq!(Constraint::Required.message("name"), "name is required");
        assert_eq!(
            Constraint::MinLength(3).message("code"),
            "code must be at least 3 characters"
        );
        assert_eq!(
            Constraint::Gte(17.0).message("age"),
            "age must be greater than or equal to 17"
        );
        assert_eq!(
            Constraint::OneOf(&["active", "broken"]).message("status"),
            "status must be one of: active broken"
        );

        let custom = Constraint::Custom {
            name: "even",
            check: |_| false,
        };
        assert_eq!(custom.message("stock"), "stock is invalid");
        assert_eq!(custom.name(), "even");
        assert_eq!(Constraint::MinLength(1).name(), "min_length");
    }
}
