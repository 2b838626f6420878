use crate::outcome::ChainOutcome;
use crate::runner::ChainRunner;
use railway_core::ChainError;
use serde_json::Value;

/// Wraps a whole chain run.
///
/// The hook receives the prepared runner and the initial input. It must call
/// [`ChainRunner::call`] itself and return an outcome of the same shape,
/// typically the runner's own. Use it to open a transaction, commit it on
/// success and roll it back when `outcome.is_failure()`.
pub trait Around: Send + Sync {
    /// Run `runner` on `input`, with whatever happens before and after.
    fn around(&self, runner: &ChainRunner, input: Value) -> Result<ChainOutcome, ChainError>;
}

/// Adapter turning a closure into [`Around`].
pub struct AroundFn<F>(pub F);

impl<F> Around for AroundFn<F>
where
    F: Fn(&ChainRunner, Value) -> Result<ChainOutcome, ChainError> + Send + Sync,
{
    fn around(&self, runner: &ChainRunner, input: Value) -> Result<ChainOutcome, ChainError> {
        (self.0)(runner, input)
    }
}
