//! The Logic protocol: what an operation actually does.

use crate::error::OperationError;
use crate::flow::Flow;
use serde_json::Value;
use std::sync::Arc;

/// User-supplied body of an operation.
///
/// `input` has already passed through the input constructor. `settings` is
/// the value bound with `with(..)`, or the declared default settings, or
/// `None`. Report business outcomes through [`Flow`]; use `Err` only for
/// genuine programming or contract errors.
pub trait Logic: Send + Sync {
    /// Run the operation body.
    fn call(&self, input: Value, settings: Option<&Value>) -> Result<Flow, OperationError>;
}

impl<L: Logic + ?Sized> Logic for Arc<L> {
    fn call(&self, input: Value, settings: Option<&Value>) -> Result<Flow, OperationError> {
        (**self).call(input, settings)
    }
}

impl<L: Logic + ?Sized> Logic for Box<L> {
    fn call(&self, input: Value, settings: Option<&Value>) -> Result<Flow, OperationError> {
        (**self).call(input, settings)
    }
}

/// Adapter turning a closure into [`Logic`].
pub struct LogicFn<F>(pub F);

impl<F> Logic for LogicFn<F>
where
    F: Fn(Value, Option<&Value>) -> Result<Flow, OperationError> + Send + Sync,
{
    fn call(&self, input: Value, settings: Option<&Value>) -> Result<Flow, OperationError> {
        (self.0)(input, settings)
    }
}
