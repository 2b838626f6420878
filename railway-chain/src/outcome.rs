use railway_core::{Outcome, StepName};
use serde::Serialize;
use serde_json::Value;
use std::ops::Deref;

/// Outcome of a chain run: the last step's outcome plus the name of that
/// step.
///
/// Derefs to [`Outcome`], so `is_successful`, `success`, `failure` and the
/// other accessors work unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainOutcome {
    #[serde(flatten)]
    outcome: Outcome,
    step: Option<StepName>,
}

impl ChainOutcome {
    /// Build a chain outcome. `step` is `None` only when no step ran.
    pub fn new(value: Value, successful: bool, step: Option<StepName>) -> Self {
        Self {
            outcome: Outcome::new(value, successful),
            step,
        }
    }

    /// The last step executed.
    pub fn step(&self) -> Option<&StepName> {
        self.step.as_ref()
    }

    /// The wrapped outcome.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// The payload, successful or not.
    pub fn into_value(self) -> Value {
        self.outcome.into_value()
    }

    /// `Ok(value)` on success, `Err(value)` on failure.
    pub fn into_result(self) -> Result<Value, Value> {
        self.outcome.into_result()
    }

    /// Split into the wrapped outcome and the last step.
    pub fn into_parts(self) -> (Outcome, Option<StepName>) {
        (self.outcome, self.step)
    }
}

impl Deref for ChainOutcome {
    type Target = Outcome;

    fn deref(&self) -> &Outcome {
        &self.outcome
    }
}

impl From<ChainOutcome> for Outcome {
    fn from(outcome: ChainOutcome) -> Self {
        outcome.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn derefs_to_outcome() {
        let outcome = ChainOutcome::new(json!(1), false, Some("befriend".into()));
        assert!(outcome.is_failure());
        assert_eq!(outcome.failure(), Some(&json!(1)));
        assert_eq!(outcome.step().map(StepName::as_str), Some("befriend"));
    }

    #[test]
    fn consuming_accessors() {
        let ok = ChainOutcome::new(json!(2), true, Some("create".into()));
        assert_eq!(ok.clone().into_value(), json!(2));
        assert_eq!(ok.into_result(), Ok(json!(2)));

        let failed = ChainOutcome::new(json!("no"), false, Some("befriend".into()));
        assert_eq!(failed.into_result(), Err(json!("no")));
    }

    #[test]
    fn serializes_flat() {
        let outcome = ChainOutcome::new(json!({"id": 7}), true, Some("create".into()));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"success": true, "value": {"id": 7}, "step": "create"})
        );
    }
}
