use std::collections::BTreeMap;
use std::fmt;

use derive_more::Deref;
use serde::Serialize;

/// Field-to-message map produced by a failed validation.
///
/// Keys are lowercased field names; iteration and serialization follow key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    /// Creates an empty error map.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an error map holding a single entry.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Records a message for the field unless one is already present.
    ///
    /// Returns whether the message was recorded.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) -> bool {
        let field = field.into().to_lowercase();
        if self.0.contains_key(&field) {
            return false;
        }

        self.0.insert(field, message.into());
        true
    }

    /// Returns the message recorded for the field.
    #[inline]
    pub fn message(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Converts an empty map into `Ok(())` and a non-empty one into `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_message_wins() {
        let mut errors = ValidationErrors::new();
        assert!(errors.insert("Name", "name is required"));
        assert!(!errors.insert("name", "name must be at least 3 characters"));
        assert_eq!(errors.message("name"), Some("name is required"));
    }

    #[test]
    fn serializes_sorted() {
        let mut errors = ValidationErrors::new();
        errors.insert("status", "b");
        errors.insert("code", "a");

        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"code":"a","status":"b"}"#);
    }

    #[test]
    fn empty_map_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
        assert!(ValidationErrors::single("id", "x").into_result().is_err());
    }
}
