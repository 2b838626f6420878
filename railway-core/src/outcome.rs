//! The immutable success/failure wrapper produced by every operation call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one operation invocation.
///
/// Fields are private: once built, an outcome never changes its flag or
/// its value. [`is_successful`](Self::is_successful) and
/// [`is_failure`](Self::is_failure) are always complements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(rename = "success")]
    successful: bool,
    value: Value,
}

/// Named view of an outcome, for `let OutcomeFields { success, value } = ..`
/// style destructuring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeFields<'a> {
    /// Whether the outcome is a success.
    pub success: bool,
    /// The payload.
    pub value: &'a Value,
}

impl Outcome {
    /// Build an outcome.
    pub fn new(value: Value, successful: bool) -> Self {
        Self { successful, value }
    }

    /// A successful outcome.
    pub fn succeeded(value: Value) -> Self {
        Self::new(value, true)
    }

    /// A failed outcome.
    pub fn failed(value: Value) -> Self {
        Self::new(value, false)
    }

    /// Whether the operation succeeded.
    pub fn is_successful(&self) -> bool {
        self.successful
    }

    /// Whether the operation failed.
    pub fn is_failure(&self) -> bool {
        !self.successful
    }

    /// The raw payload, regardless of outcome.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consume the outcome, keeping only the payload.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// The payload if successful.
    pub fn success(&self) -> Option<&Value> {
        self.successful.then_some(&self.value)
    }

    /// The payload if successful, otherwise `default`.
    pub fn success_or(&self, default: Value) -> Value {
        self.success().cloned().unwrap_or(default)
    }

    /// The payload if successful, otherwise `fallback` applied to the
    /// failure payload.
    pub fn success_or_else(&self, fallback: impl FnOnce(&Value) -> Value) -> Value {
        match self.success() {
            Some(value) => value.clone(),
            None => fallback(&self.value),
        }
    }

    /// The payload if failed.
    pub fn failure(&self) -> Option<&Value> {
        (!self.successful).then_some(&self.value)
    }

    /// The payload if failed, otherwise `default`.
    pub fn failure_or(&self, default: Value) -> Value {
        self.failure().cloned().unwrap_or(default)
    }

    /// The payload if failed, otherwise `fallback` applied to the success
    /// payload.
    pub fn failure_or_else(&self, fallback: impl FnOnce(&Value) -> Value) -> Value {
        match self.failure() {
            Some(value) => value.clone(),
            None => fallback(&self.value),
        }
    }

    /// Positional destructuring: `(successful, value)`.
    pub fn into_parts(self) -> (bool, Value) {
        (self.successful, self.value)
    }

    /// Named destructuring.
    pub fn fields(&self) -> OutcomeFields<'_> {
        OutcomeFields {
            success: self.successful,
            value: &self.value,
        }
    }

    /// Convert into a std `Result`, success in `Ok` and failure in `Err`.
    pub fn into_result(self) -> Result<Value, Value> {
        if self.successful {
            Ok(self.value)
        } else {
            Err(self.value)
        }
    }
}

impl From<Outcome> for (bool, Value) {
    fn from(outcome: Outcome) -> Self {
        outcome.into_parts()
    }
}

impl From<Outcome> for Result<Value, Value> {
    fn from(outcome: Outcome) -> Self {
        outcome.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flags_are_complements() {
        for flag in [true, false] {
            let outcome = Outcome::new(json!(1), flag);
            assert_eq!(outcome.is_successful(), !outcome.is_failure());
        }
    }

    #[test]
    fn success_accessors() {
        let outcome = Outcome::succeeded(json!("v"));
        assert_eq!(outcome.value(), &json!("v"));
        assert_eq!(outcome.success(), Some(&json!("v")));
        assert_eq!(outcome.failure(), None);
        assert_eq!(outcome.failure_or(json!("d")), json!("d"));
        assert_eq!(outcome.failure_or_else(|v| json!({ "was": v })), json!({"was": "v"}));
    }

    #[test]
    fn failure_accessors() {
        let outcome = Outcome::failed(json!({"message": "nope"}));
        assert_eq!(outcome.success(), None);
        assert_eq!(outcome.success_or(json!(0)), json!(0));
        assert_eq!(outcome.success_or_else(|v| v["message"].clone()), json!("nope"));
        assert_eq!(outcome.failure(), Some(&json!({"message": "nope"})));
    }

    #[test]
    fn destructuring() {
        let (ok, value) = Outcome::succeeded(json!(3)).into_parts();
        assert!(ok);
        assert_eq!(value, json!(3));

        let outcome = Outcome::failed(json!(4));
        let OutcomeFields { success, value } = outcome.fields();
        assert!(!success);
        assert_eq!(value, &json!(4));

        match Outcome::failed(json!("e")).into_result() {
            Ok(_) => panic!("expected failure"),
            Err(value) => assert_eq!(value, json!("e")),
        }
    }

    #[test]
    fn serializes_as_success_and_value() {
        let outcome = Outcome::succeeded(json!({"name": "Bob"}));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"success": true, "value": {"name": "Bob"}})
        );
    }
}
