//! How a prepared call is executed.

use crate::runner::OperationRunner;
use railway_core::{OperationError, Outcome};
use serde_json::Value;

/// Executes calls on behalf of an [`OperationRunner`].
///
/// Every [`OperationRunner::call`] is handed to the operation's strategy.
/// [`StandardRun`] runs the built-in pipeline through
/// [`OperationRunner::execute`]. A custom strategy may wrap that pipeline
/// (instrumentation, retries) or answer without it, as long as it returns
/// an [`Outcome`].
pub trait RunStrategy: Send + Sync {
    /// Execute one call of `runner` on `input`.
    fn run(&self, runner: &OperationRunner, input: Value) -> Result<Outcome, OperationError>;
}

/// The built-in pipeline. Used when a definition sets no runner.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRun;

impl RunStrategy for StandardRun {
    fn run(&self, runner: &OperationRunner, input: Value) -> Result<Outcome, OperationError> {
        runner.execute(input)
    }
}

/// Adapter turning a closure into [`RunStrategy`].
pub struct RunStrategyFn<F>(pub F);

impl<F> RunStrategy for RunStrategyFn<F>
where
    F: Fn(&OperationRunner, Value) -> Result<Outcome, OperationError> + Send + Sync,
{
    fn run(&self, runner: &OperationRunner, input: Value) -> Result<Outcome, OperationError> {
        (self.0)(runner, input)
    }
}
