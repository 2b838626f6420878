use crate::builder::{OperationBuilder, ResultConstructor, Setting};
use crate::runner::OperationRunner;
use crate::strategy::RunStrategy;
use railway_core::{
    Args, Config, Constructor, Contract, Logic, OperationError, OperationName, Outcome,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A contract together with its resolved constructor.
pub(crate) struct Bound {
    pub(crate) contract: Arc<dyn Contract>,
    pub(crate) construct: Constructor,
}

impl Bound {
    fn build(&self, args: Args) -> Result<Value, OperationError> {
        Ok((self.construct)(args)?)
    }
}

pub(crate) struct Definition {
    pub(crate) name: OperationName,
    pub(crate) declared: Config<&'static str, Setting>,
    pub(crate) input: Bound,
    pub(crate) output: Bound,
    pub(crate) error: Bound,
    pub(crate) settings: Bound,
    pub(crate) default_settings: Option<Args>,
    pub(crate) result: ResultConstructor,
    pub(crate) logic: Arc<dyn Logic>,
    pub(crate) runner: Arc<dyn RunStrategy>,
}

/// A finalized operation definition.
///
/// Immutable and cheap to clone; clones share the same definition. Calling
/// it never mutates it, so one `Operation` can serve any number of threads.
#[derive(Clone)]
pub struct Operation {
    inner: Arc<Definition>,
}

impl Operation {
    pub(crate) fn from_definition(definition: Definition) -> Self {
        Self {
            inner: Arc::new(definition),
        }
    }

    /// Name of the operation.
    pub fn name(&self) -> &OperationName {
        &self.inner.name
    }

    /// Input contract.
    pub fn input(&self) -> &Arc<dyn Contract> {
        &self.inner.input.contract
    }

    /// Output contract.
    pub fn output(&self) -> &Arc<dyn Contract> {
        &self.inner.output.contract
    }

    /// Error contract.
    pub fn error(&self) -> &Arc<dyn Contract> {
        &self.inner.error.contract
    }

    /// Settings contract.
    pub fn settings(&self) -> &Arc<dyn Contract> {
        &self.inner.settings.contract
    }

    /// Whether default settings were declared.
    pub fn has_default_settings(&self) -> bool {
        self.inner.default_settings.is_some()
    }

    /// A fresh runner with no settings bound.
    pub fn runner(&self) -> OperationRunner {
        OperationRunner::new(self.clone())
    }

    /// A runner with `raw` settings built through the settings constructor.
    pub fn with(&self, raw: Value) -> Result<OperationRunner, OperationError> {
        self.runner().with(raw)
    }

    /// Run the operation once.
    pub fn call(&self, input: Value) -> Result<Outcome, OperationError> {
        self.runner().call(input)
    }

    /// Run the operation once and keep only the payload, dropping the
    /// success flag.
    pub fn call_value(&self, input: Value) -> Result<Value, OperationError> {
        Ok(self.call(input)?.into_value())
    }

    /// An unfrozen builder carrying every slot this definition declared
    /// explicitly. Defaults filled in during finalization are not copied,
    /// so the new definition may still set them.
    pub fn to_builder(&self, name: impl Into<OperationName>) -> OperationBuilder {
        let name = name.into();
        let config = self.inner.declared.thaw_copy(name.as_str());
        OperationBuilder::from_config(name, config)
    }

    pub(crate) fn logic(&self) -> &dyn Logic {
        &*self.inner.logic
    }

    pub(crate) fn strategy(&self) -> &dyn RunStrategy {
        &*self.inner.runner
    }

    pub(crate) fn construct_input(&self, raw: Value) -> Result<Value, OperationError> {
        self.inner.input.build(vec![raw])
    }

    pub(crate) fn construct_settings(&self, args: Args) -> Result<Value, OperationError> {
        self.inner.settings.build(args)
    }

    pub(crate) fn default_settings(&self) -> Result<Option<Value>, OperationError> {
        match &self.inner.default_settings {
            Some(args) => Ok(Some(self.construct_settings(args.clone())?)),
            None => Ok(None),
        }
    }

    /// Build the success or failure payload. A single argument that already
    /// conforms is used unchanged.
    pub(crate) fn construct_payload(
        &self,
        mut args: Args,
        successful: bool,
    ) -> Result<Value, OperationError> {
        let bound = if successful {
            &self.inner.output
        } else {
            &self.inner.error
        };
        if args.len() == 1 && bound.contract.conforms(&args[0]) {
            return Ok(args.pop().unwrap_or_default());
        }
        bound.build(args)
    }

    pub(crate) fn wrap(&self, value: Value, successful: bool) -> Outcome {
        (self.inner.result)(value, successful)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.inner.name)
            .field("input", &self.inner.input.contract)
            .field("output", &self.inner.output.contract)
            .field("error", &self.inner.error.contract)
            .field("settings", &self.inner.settings.contract)
            .field("default_settings", &self.inner.default_settings)
            .finish()
    }
}
