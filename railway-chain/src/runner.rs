use crate::chain::Chain;
use crate::outcome::ChainOutcome;
use railway_core::{ChainError, ConfigError, Outcome, StepName};
use railway_op::OperationRunner;
use serde_json::Value;

/// Threads one value through a chain's steps, stopping at the first
/// failure.
///
/// Built per call by [`Chain::runner`], [`Chain::with`] or
/// [`Chain::call`]. Calling it directly skips the around hook; this is the
/// callable an around hook receives.
#[derive(Debug)]
pub struct ChainRunner {
    chain: Chain,
    steps: Vec<(StepName, OperationRunner)>,
}

impl ChainRunner {
    /// Bind `settings` to the steps they name. Other steps get a plain
    /// runner.
    pub(crate) fn new(chain: Chain, settings: &[(StepName, Value)]) -> Result<Self, ChainError> {
        for (step, _) in settings {
            if chain.step(step.as_str()).is_none() {
                tracing::debug!(chain = %chain.name(), step = %step, "railway.chain.override_ignored");
            }
        }

        let steps = chain
            .steps()
            .map(|step| -> Result<(StepName, OperationRunner), ChainError> {
                let runner = match settings.iter().find(|(name, _)| name == step.name()) {
                    Some((_, raw)) => step
                        .operation()
                        .with(raw.clone())
                        .map_err(|source| ChainError::Step {
                            step: step.name().clone(),
                            source,
                        })?,
                    None => step.operation().runner(),
                };
                Ok((step.name().clone(), runner))
            })
            .collect::<Result<Vec<_>, ChainError>>()?;

        Ok(Self { chain, steps })
    }

    /// The chain being run.
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Settings bound to `step` for this run.
    pub fn settings(&self, step: &str) -> Option<&Value> {
        self.runner_for(step).and_then(OperationRunner::settings)
    }

    /// Step names and their prepared runners, in execution order.
    pub fn steps(&self) -> impl Iterator<Item = (&StepName, &OperationRunner)> {
        self.steps.iter().map(|(name, runner)| (name, runner))
    }

    /// Run the pipeline on `input` through the chain's
    /// [`ChainRunStrategy`](crate::ChainRunStrategy).
    pub fn call(&self, input: Value) -> Result<ChainOutcome, ChainError> {
        let _span = tracing::debug_span!("railway.chain.call", chain = %self.chain.name()).entered();
        self.chain.strategy().run(self, input)
    }

    /// Thread `input` through every step, bypassing the strategy.
    ///
    /// Each step receives the previous step's payload. The first failed
    /// outcome stops the run; later steps never execute. A step that raises
    /// aborts the run with [`ChainError::Step`].
    pub fn execute(&self, input: Value) -> Result<ChainOutcome, ChainError> {
        let chain = self.chain.name();
        let mut value = input;
        let mut successful = true;
        let mut last: Option<StepName> = None;

        for (name, runner) in &self.steps {
            let (ok, payload) = run_step(chain, name, runner, value)?.into_parts();
            value = payload;
            successful = ok;
            last = Some(name.clone());
            if !successful {
                tracing::debug!(chain = %chain, step = %name, "railway.chain.halt");
                break;
            }
        }

        Ok(self.finish(value, successful, last))
    }

    /// Run a single step on `input`. Fails with
    /// [`ConfigError::UnknownStep`] when the chain has no such step.
    pub fn call_step(&self, step: &str, input: Value) -> Result<Outcome, ChainError> {
        let (name, runner) = self
            .steps
            .iter()
            .find(|(name, _)| name == step)
            .ok_or_else(|| ConfigError::UnknownStep { step: step.into() })?;
        run_step(self.chain.name(), name, runner, input)
    }

    /// Wrap a final value through the chain's result constructor.
    pub fn finish(&self, value: Value, successful: bool, step: Option<StepName>) -> ChainOutcome {
        self.chain.wrap(value, successful, step)
    }

    fn runner_for(&self, step: &str) -> Option<&OperationRunner> {
        self.steps
            .iter()
            .find(|(name, _)| name == step)
            .map(|(_, runner)| runner)
    }
}

fn run_step(
    chain: &str,
    name: &StepName,
    runner: &OperationRunner,
    input: Value,
) -> Result<Outcome, ChainError> {
    tracing::debug!(chain = %chain, step = %name, "railway.chain.step");
    runner.call(input).map_err(|source| ChainError::Step {
        step: name.clone(),
        source,
    })
}
