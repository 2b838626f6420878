//! ConstantLogic: ignores its input and always returns the same flow.

use crate::error::OperationError;
use crate::flow::Flow;
use crate::logic::Logic;
use serde_json::Value;

/// Logic that returns a fixed [`Flow`] on every call.
pub struct ConstantLogic {
    flow: Flow,
}

impl ConstantLogic {
    /// Always return `flow`.
    pub fn new(flow: Flow) -> Self {
        Self { flow }
    }

    /// Always succeed with `value`.
    pub fn succeeding(value: impl Into<Value>) -> Self {
        Self::new(Flow::success(value))
    }

    /// Always fail with `value`.
    pub fn failing(value: impl Into<Value>) -> Self {
        Self::new(Flow::fail(value))
    }
}

impl Logic for ConstantLogic {
    fn call(&self, _input: Value, _settings: Option<&Value>) -> Result<Flow, OperationError> {
        Ok(self.flow.clone())
    }
}
