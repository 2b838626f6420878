use crate::operation::{Bound, Definition, Operation};
use crate::runner::OperationRunner;
use crate::strategy::{RunStrategy, RunStrategyFn, StandardRun};
use railway_core::{
    AnyContract, Args, Config, ConfigError, Constructor, ConstructorSpec, Contract, Flow, Logic,
    LogicFn, NoneContract, OperationError, OperationName, Outcome,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Wraps a constructed payload and its success flag into an [`Outcome`].
pub type ResultConstructor = Arc<dyn Fn(Value, bool) -> Outcome + Send + Sync>;

pub(crate) const INPUT: &str = "input";
pub(crate) const INPUT_CONSTRUCTOR: &str = "input_constructor";
pub(crate) const OUTPUT: &str = "output";
pub(crate) const OUTPUT_CONSTRUCTOR: &str = "output_constructor";
pub(crate) const ERROR: &str = "error";
pub(crate) const ERROR_CONSTRUCTOR: &str = "error_constructor";
pub(crate) const SETTINGS: &str = "settings";
pub(crate) const SETTINGS_CONSTRUCTOR: &str = "settings_constructor";
pub(crate) const DEFAULT_SETTINGS: &str = "default_settings";
pub(crate) const RESULT_CONSTRUCTOR: &str = "result_constructor";
pub(crate) const LOGIC: &str = "logic";
pub(crate) const RUNNER: &str = "runner";

/// One configured value. Every builder setter lands in the same
/// [`Config`], so each slot can be written exactly once.
#[derive(Clone)]
pub(crate) enum Setting {
    Contract(Arc<dyn Contract>),
    Constructor(ConstructorSpec),
    Args(Args),
    Result(ResultConstructor),
    Logic(Arc<dyn Logic>),
    Runner(Arc<dyn RunStrategy>),
}

/// Definition phase of an [`Operation`].
///
/// Setters never fail on the spot: the first configuration error is kept
/// and returned by [`finalize`](Self::finalize), so a definition reads as a
/// single chain of calls.
pub struct OperationBuilder {
    name: OperationName,
    config: Config<&'static str, Setting>,
    error: Option<ConfigError>,
}

impl OperationBuilder {
    /// Start a new definition.
    pub fn new(name: impl Into<OperationName>) -> Self {
        let name = name.into();
        Self {
            config: Config::new(name.as_str()),
            name,
            error: None,
        }
    }

    /// Start a definition whose input, output and error all accept any
    /// value. Useful for glue steps.
    pub fn passthrough(name: impl Into<OperationName>) -> Self {
        Self::new(name)
            .input(AnyContract)
            .output(AnyContract)
            .error(AnyContract)
    }

    pub(crate) fn from_config(name: OperationName, config: Config<&'static str, Setting>) -> Self {
        Self {
            name,
            config,
            error: None,
        }
    }

    /// Name of the operation being defined.
    pub fn name(&self) -> &OperationName {
        &self.name
    }

    /// Input contract. Required.
    pub fn input(self, contract: impl Contract + 'static) -> Self {
        self.set(INPUT, Setting::Contract(Arc::new(contract)))
    }

    /// How raw input is turned into a conforming value. Defaults to the
    /// contract's `new` factory.
    pub fn input_constructor(self, spec: ConstructorSpec) -> Self {
        self.set(INPUT_CONSTRUCTOR, Setting::Constructor(spec))
    }

    /// Output contract. Required.
    pub fn output(self, contract: impl Contract + 'static) -> Self {
        self.set(OUTPUT, Setting::Contract(Arc::new(contract)))
    }

    /// How success payloads are built. Defaults to the contract's `new`
    /// factory.
    pub fn output_constructor(self, spec: ConstructorSpec) -> Self {
        self.set(OUTPUT_CONSTRUCTOR, Setting::Constructor(spec))
    }

    /// Error contract. Required.
    pub fn error(self, contract: impl Contract + 'static) -> Self {
        self.set(ERROR, Setting::Contract(Arc::new(contract)))
    }

    /// How failure payloads are built. Defaults to the contract's `new`
    /// factory.
    pub fn error_constructor(self, spec: ConstructorSpec) -> Self {
        self.set(ERROR_CONSTRUCTOR, Setting::Constructor(spec))
    }

    /// Settings contract. Defaults to [`NoneContract`], which rejects any
    /// settings value.
    pub fn settings(self, contract: impl Contract + 'static) -> Self {
        self.set(SETTINGS, Setting::Contract(Arc::new(contract)))
    }

    /// How raw settings are built. Defaults to the contract's `new`
    /// factory.
    pub fn settings_constructor(self, spec: ConstructorSpec) -> Self {
        self.set(SETTINGS_CONSTRUCTOR, Setting::Constructor(spec))
    }

    /// Settings used when a call binds none. Built through the settings
    /// constructor on every such call; explicitly bound settings replace
    /// them entirely.
    pub fn default_settings(self, raw: Value) -> Self {
        self.default_settings_with(vec![raw])
    }

    /// Like [`default_settings`](Self::default_settings), with raw
    /// constructor arguments.
    pub fn default_settings_with(self, args: Args) -> Self {
        self.set(DEFAULT_SETTINGS, Setting::Args(args))
    }

    /// How payloads become outcomes. Defaults to [`Outcome::new`].
    pub fn result_constructor<F>(self, f: F) -> Self
    where
        F: Fn(Value, bool) -> Outcome + Send + Sync + 'static,
    {
        self.set(RESULT_CONSTRUCTOR, Setting::Result(Arc::new(f)))
    }

    /// The operation body. Required.
    pub fn logic(self, logic: impl Logic + 'static) -> Self {
        self.set(LOGIC, Setting::Logic(Arc::new(logic)))
    }

    /// The operation body as a shared trait object.
    pub fn logic_shared(self, logic: Arc<dyn Logic>) -> Self {
        self.set(LOGIC, Setting::Logic(logic))
    }

    /// The operation body as a closure.
    pub fn logic_fn<F>(self, f: F) -> Self
    where
        F: Fn(Value, Option<&Value>) -> Result<Flow, OperationError> + Send + Sync + 'static,
    {
        self.logic(LogicFn(f))
    }

    /// How calls are executed. Defaults to [`StandardRun`].
    pub fn runner(self, runner: impl RunStrategy + 'static) -> Self {
        self.set(RUNNER, Setting::Runner(Arc::new(runner)))
    }

    /// How calls are executed, as a closure. Call
    /// [`OperationRunner::execute`] to run the built-in pipeline.
    pub fn runner_fn<F>(self, f: F) -> Self
    where
        F: Fn(&OperationRunner, Value) -> Result<Outcome, OperationError> + Send + Sync + 'static,
    {
        self.runner(RunStrategyFn(f))
    }

    /// Validate the definition and lock it.
    ///
    /// Fails with the first recorded setter error, with
    /// [`ConfigError::Missing`] when `input`, `output`, `error` or `logic`
    /// is absent, or when a named constructor does not exist on its
    /// contract.
    pub fn finalize(mut self) -> Result<Operation, ConfigError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }

        let mut declared = self.config.clone();
        declared.freeze()?;

        let input = self.bind(INPUT, INPUT_CONSTRUCTOR)?;
        let output = self.bind(OUTPUT, OUTPUT_CONSTRUCTOR)?;
        let error = self.bind(ERROR, ERROR_CONSTRUCTOR)?;

        self.config.fetch_with_default(SETTINGS, || {
            Setting::Contract(Arc::new(NoneContract))
        })?;
        let settings = self.bind(SETTINGS, SETTINGS_CONSTRUCTOR)?;

        let default_settings = match self.config.get(DEFAULT_SETTINGS) {
            Some(Setting::Args(args)) => Some(args.clone()),
            _ => None,
        };

        let result = match self
            .config
            .fetch_with_default(RESULT_CONSTRUCTOR, || Setting::Result(Arc::new(Outcome::new)))?
        {
            Setting::Result(f) => Arc::clone(f),
            _ => return Err(ConfigError::missing(RESULT_CONSTRUCTOR)),
        };

        let logic = match self.config.require(LOGIC)? {
            Setting::Logic(logic) => Arc::clone(logic),
            _ => return Err(ConfigError::missing(LOGIC)),
        };

        let runner = match self
            .config
            .fetch_with_default(RUNNER, || Setting::Runner(Arc::new(StandardRun)))?
        {
            Setting::Runner(runner) => Arc::clone(runner),
            _ => return Err(ConfigError::missing(RUNNER)),
        };

        self.config.freeze()?;
        tracing::debug!(operation = %self.name, "railway.operation.finalized");

        Ok(Operation::from_definition(Definition {
            name: self.name,
            declared,
            input,
            output,
            error,
            settings,
            default_settings,
            result,
            logic,
            runner,
        }))
    }

    fn set(mut self, key: &'static str, setting: Setting) -> Self {
        if self.error.is_none() {
            if let Err(err) = self.config.set_or_get(key, Some(setting)) {
                self.error = Some(err);
            }
        }
        self
    }

    fn bind(
        &mut self,
        contract_key: &'static str,
        constructor_key: &'static str,
    ) -> Result<Bound, ConfigError> {
        let contract = match self.config.require(contract_key)? {
            Setting::Contract(contract) => Arc::clone(contract),
            _ => return Err(ConfigError::missing(contract_key)),
        };
        let spec = match self
            .config
            .fetch_with_default(constructor_key, || Setting::Constructor(ConstructorSpec::default()))?
        {
            Setting::Constructor(spec) => spec.clone(),
            _ => return Err(ConfigError::missing(constructor_key)),
        };
        let construct: Constructor = spec
            .resolve(&*contract)
            .ok_or_else(|| ConfigError::missing(constructor_key))?;
        Ok(Bound {
            contract,
            construct,
        })
    }
}

impl fmt::Debug for OperationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.config.keys().copied().collect();
        f.debug_struct("OperationBuilder")
            .field("name", &self.name)
            .field("configured", &keys)
            .field("error", &self.error)
            .finish()
    }
}
