//! How a prepared chain run is executed.

use crate::outcome::ChainOutcome;
use crate::runner::ChainRunner;
use railway_core::ChainError;
use serde_json::Value;

/// Executes runs on behalf of a [`ChainRunner`].
///
/// [`ChainRunner::call`] hands every run to the chain's strategy, inside the
/// around hook if there is one. [`StandardChainRun`] threads the value
/// through the steps with [`ChainRunner::execute`]. A custom strategy can
/// drive the steps itself through [`ChainRunner::steps`],
/// [`ChainRunner::call_step`] and [`ChainRunner::finish`].
pub trait ChainRunStrategy: Send + Sync {
    /// Execute one run of `runner` on `input`.
    fn run(&self, runner: &ChainRunner, input: Value) -> Result<ChainOutcome, ChainError>;
}

/// Threads the value through every step, stopping at the first failure.
/// Used when a chain sets no runner.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChainRun;

impl ChainRunStrategy for StandardChainRun {
    fn run(&self, runner: &ChainRunner, input: Value) -> Result<ChainOutcome, ChainError> {
        runner.execute(input)
    }
}

/// Adapter turning a closure into [`ChainRunStrategy`].
pub struct ChainRunStrategyFn<F>(pub F);

impl<F> ChainRunStrategy for ChainRunStrategyFn<F>
where
    F: Fn(&ChainRunner, Value) -> Result<ChainOutcome, ChainError> + Send + Sync,
{
    fn run(&self, runner: &ChainRunner, input: Value) -> Result<ChainOutcome, ChainError> {
        (self.0)(runner, input)
    }
}
