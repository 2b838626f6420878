use crate::around::{Around, AroundFn};
use crate::chain::{Chain, ChainDefinition, Step};
use crate::outcome::ChainOutcome;
use crate::runner::ChainRunner;
use crate::strategy::{ChainRunStrategy, ChainRunStrategyFn, StandardChainRun};
use railway_core::{ChainError, Config, ConfigError, StepName};
use railway_op::{Operation, OperationBuilder};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Wraps the final value, success flag and last step into a
/// [`ChainOutcome`].
pub type ChainResultConstructor =
    Arc<dyn Fn(Value, bool, Option<StepName>) -> ChainOutcome + Send + Sync>;

const AROUND: &str = "around";
const RESULT_CONSTRUCTOR: &str = "result_constructor";
const RUNNER: &str = "runner";
const STEPS: &str = "steps";

#[derive(Clone)]
enum Hook {
    Around(Arc<dyn Around>),
    Result(ChainResultConstructor),
    Runner(Arc<dyn ChainRunStrategy>),
}

/// An operation for a step, finalized already or finalized together with
/// the chain.
pub enum StepSource {
    /// A finalized operation.
    Finalized(Operation),
    /// A definition still being built.
    Pending(OperationBuilder),
}

impl StepSource {
    fn finalize(self) -> Result<Operation, ConfigError> {
        match self {
            Self::Finalized(op) => Ok(op),
            Self::Pending(builder) => builder.finalize(),
        }
    }
}

impl From<Operation> for StepSource {
    fn from(op: Operation) -> Self {
        Self::Finalized(op)
    }
}

impl From<&Operation> for StepSource {
    fn from(op: &Operation) -> Self {
        Self::Finalized(op.clone())
    }
}

impl From<OperationBuilder> for StepSource {
    fn from(builder: OperationBuilder) -> Self {
        Self::Pending(builder)
    }
}

/// Definition phase of a [`Chain`].
///
/// As with operations, setters record the first configuration error and
/// [`finalize`](Self::finalize) reports it.
pub struct ChainBuilder {
    name: String,
    steps: Config<StepName, StepSource>,
    hooks: Config<&'static str, Hook>,
    default_settings: Config<StepName, Value>,
    error: Option<ConfigError>,
}

impl ChainBuilder {
    /// Start a new chain definition.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            steps: Config::new(name.as_str()),
            hooks: Config::new(name.as_str()),
            default_settings: Config::new(name.as_str()),
            name,
            error: None,
        }
    }

    /// Append a step. Step names must be unique within the chain.
    pub fn step(mut self, name: impl Into<StepName>, operation: impl Into<StepSource>) -> Self {
        let result = self.steps.set_or_get(name.into(), Some(operation.into())).map(drop);
        self.record(result);
        self
    }

    /// Wrap every run of the chain in `around`.
    pub fn around(mut self, around: impl Around + 'static) -> Self {
        let result = self
            .hooks
            .set_or_get(AROUND, Some(Hook::Around(Arc::new(around))))
            .map(drop);
        self.record(result);
        self
    }

    /// Wrap every run of the chain in a closure.
    pub fn around_fn<F>(self, f: F) -> Self
    where
        F: Fn(&ChainRunner, Value) -> Result<ChainOutcome, ChainError> + Send + Sync + 'static,
    {
        self.around(AroundFn(f))
    }

    /// How the steps are driven. Defaults to [`StandardChainRun`].
    pub fn runner(mut self, runner: impl ChainRunStrategy + 'static) -> Self {
        let result = self
            .hooks
            .set_or_get(RUNNER, Some(Hook::Runner(Arc::new(runner))))
            .map(drop);
        self.record(result);
        self
    }

    /// How the steps are driven, as a closure. Call
    /// [`ChainRunner::execute`] to run the built-in pipeline.
    pub fn runner_fn<F>(self, f: F) -> Self
    where
        F: Fn(&ChainRunner, Value) -> Result<ChainOutcome, ChainError> + Send + Sync + 'static,
    {
        self.runner(ChainRunStrategyFn(f))
    }

    /// How the final value becomes a [`ChainOutcome`]. Defaults to
    /// [`ChainOutcome::new`].
    pub fn result_constructor<F>(mut self, f: F) -> Self
    where
        F: Fn(Value, bool, Option<StepName>) -> ChainOutcome + Send + Sync + 'static,
    {
        let result = self
            .hooks
            .set_or_get(RESULT_CONSTRUCTOR, Some(Hook::Result(Arc::new(f))))
            .map(drop);
        self.record(result);
        self
    }

    /// Settings bound to `step` on runs without call-time overrides.
    pub fn default_settings(mut self, step: impl Into<StepName>, raw: Value) -> Self {
        let result = self
            .default_settings
            .set_or_get(step.into(), Some(raw))
            .map(drop);
        self.record(result);
        self
    }

    /// Validate the chain, finalize every pending step operation and lock
    /// the definition.
    ///
    /// Fails with the first recorded setter error,
    /// [`ConfigError::Missing`] when there are no steps, a step's own
    /// finalization error, or [`ConfigError::UnknownStep`] when default
    /// settings name a step the chain does not have.
    pub fn finalize(mut self) -> Result<Chain, ConfigError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if self.steps.is_empty() {
            return Err(ConfigError::missing(STEPS));
        }
        if let Some(step) = self
            .default_settings
            .keys()
            .find(|step| !self.steps.contains(*step))
        {
            return Err(ConfigError::UnknownStep { step: step.clone() });
        }

        let around = match self.hooks.get(AROUND) {
            Some(Hook::Around(around)) => Some(Arc::clone(around)),
            _ => None,
        };
        let result = match self.hooks.fetch_with_default(RESULT_CONSTRUCTOR, || {
            Hook::Result(Arc::new(ChainOutcome::new))
        })? {
            Hook::Result(f) => Arc::clone(f),
            _ => return Err(ConfigError::missing(RESULT_CONSTRUCTOR)),
        };
        let runner = match self
            .hooks
            .fetch_with_default(RUNNER, || Hook::Runner(Arc::new(StandardChainRun)))?
        {
            Hook::Runner(runner) => Arc::clone(runner),
            _ => return Err(ConfigError::missing(RUNNER)),
        };
        self.hooks.freeze()?;
        self.default_settings.freeze()?;

        let mut steps = Config::new(self.name.as_str());
        for (name, source) in self.steps {
            let operation = source.finalize()?;
            steps.set_or_get(name.clone(), Some(Step::new(name, operation)))?;
        }
        steps.freeze()?;

        tracing::debug!(chain = %self.name, steps = steps.len(), "railway.chain.finalized");

        Ok(Chain::from_definition(ChainDefinition {
            name: self.name,
            steps,
            around,
            result,
            default_settings: self.default_settings,
            runner,
        }))
    }

    fn record(&mut self, result: Result<(), ConfigError>) {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
    }
}

impl fmt::Debug for ChainBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<&str> = self.steps.keys().map(StepName::as_str).collect();
        f.debug_struct("ChainBuilder")
            .field("name", &self.name)
            .field("steps", &steps)
            .field("error", &self.error)
            .finish()
    }
}
