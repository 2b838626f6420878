use crate::around::Around;
use crate::builder::ChainResultConstructor;
use crate::outcome::ChainOutcome;
use crate::runner::ChainRunner;
use crate::strategy::ChainRunStrategy;
use railway_core::{ChainError, Config, Contract, StepName};
use railway_op::Operation;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A named reference to an operation inside a chain.
#[derive(Debug, Clone)]
pub struct Step {
    name: StepName,
    operation: Operation,
}

impl Step {
    pub(crate) fn new(name: StepName, operation: Operation) -> Self {
        Self { name, operation }
    }

    /// Step name, unique within the chain.
    pub fn name(&self) -> &StepName {
        &self.name
    }

    /// The operation this step runs.
    pub fn operation(&self) -> &Operation {
        &self.operation
    }
}

pub(crate) struct ChainDefinition {
    pub(crate) name: String,
    pub(crate) steps: Config<StepName, Step>,
    pub(crate) around: Option<Arc<dyn Around>>,
    pub(crate) result: ChainResultConstructor,
    pub(crate) default_settings: Config<StepName, Value>,
    pub(crate) runner: Arc<dyn ChainRunStrategy>,
}

/// A finalized chain.
///
/// Immutable and cheap to clone. Every call builds a fresh
/// [`ChainRunner`], so call-time settings never leak into the definition.
#[derive(Clone)]
pub struct Chain {
    inner: Arc<ChainDefinition>,
}

impl Chain {
    pub(crate) fn from_definition(definition: ChainDefinition) -> Self {
        Self {
            inner: Arc::new(definition),
        }
    }

    /// Name of the chain.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Steps in execution order.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.inner.steps.iter().map(|(_, step)| step)
    }

    /// Look up a step by name.
    pub fn step(&self, name: &str) -> Option<&Step> {
        self.inner.steps.get(name)
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.inner.steps.len()
    }

    /// Always `false`: finalization rejects empty chains.
    pub fn is_empty(&self) -> bool {
        self.inner.steps.is_empty()
    }

    /// Input contract of the first step.
    pub fn input(&self) -> Option<&Arc<dyn Contract>> {
        self.steps().next().map(|step| step.operation().input())
    }

    /// Output contract of the last step.
    pub fn output(&self) -> Option<&Arc<dyn Contract>> {
        self.steps().last().map(|step| step.operation().output())
    }

    /// Error contract of every step, in step order.
    pub fn errors(&self) -> Vec<&Arc<dyn Contract>> {
        self.steps().map(|step| step.operation().error()).collect()
    }

    /// Whether the chain has an around hook.
    pub fn has_around(&self) -> bool {
        self.inner.around.is_some()
    }

    /// Default settings declared for `step`.
    pub fn default_settings(&self, step: &str) -> Option<&Value> {
        self.inner.default_settings.get(step)
    }

    /// A runner using the chain's default step settings. Calling it
    /// bypasses the around hook.
    pub fn runner(&self) -> Result<ChainRunner, ChainError> {
        let defaults: Vec<(StepName, Value)> = self
            .inner
            .default_settings
            .iter()
            .map(|(step, raw)| (step.clone(), raw.clone()))
            .collect();
        ChainRunner::new(self.clone(), &defaults)
    }

    /// Prepare a call with per-step settings. The overrides replace the
    /// chain's default step settings entirely; steps without an override
    /// run with their operation's own defaults. Overrides naming unknown
    /// steps are ignored.
    pub fn with<I, K>(&self, overrides: I) -> Result<ChainCall, ChainError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<StepName>,
    {
        let overrides: Vec<(StepName, Value)> = overrides
            .into_iter()
            .map(|(step, raw)| (step.into(), raw))
            .collect();
        Ok(ChainCall {
            runner: ChainRunner::new(self.clone(), &overrides)?,
        })
    }

    /// Run the chain with its default settings, through the around hook if
    /// there is one.
    pub fn call(&self, input: Value) -> Result<ChainOutcome, ChainError> {
        let runner = self.runner()?;
        self.invoke(&runner, input)
    }

    pub(crate) fn invoke(
        &self,
        runner: &ChainRunner,
        input: Value,
    ) -> Result<ChainOutcome, ChainError> {
        match &self.inner.around {
            Some(around) => around.around(runner, input),
            None => runner.call(input),
        }
    }

    pub(crate) fn strategy(&self) -> &dyn ChainRunStrategy {
        &*self.inner.runner
    }

    pub(crate) fn wrap(&self, value: Value, successful: bool, step: Option<StepName>) -> ChainOutcome {
        (self.inner.result)(value, successful, step)
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<&str> = self.steps().map(|s| s.name().as_str()).collect();
        f.debug_struct("Chain")
            .field("name", &self.inner.name)
            .field("steps", &steps)
            .field("around", &self.has_around())
            .finish()
    }
}

/// A chain call prepared with call-time settings.
#[derive(Debug)]
pub struct ChainCall {
    runner: ChainRunner,
}

impl ChainCall {
    /// The prepared runner.
    pub fn runner(&self) -> &ChainRunner {
        &self.runner
    }

    /// Run the chain, through the around hook if there is one.
    pub fn call(&self, input: Value) -> Result<ChainOutcome, ChainError> {
        self.runner.chain().invoke(&self.runner, input)
    }
}
