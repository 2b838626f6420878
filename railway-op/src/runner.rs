use crate::operation::Operation;
use railway_core::{Flow, OperationError, Outcome};
use serde_json::Value;

/// Executes one operation invocation end-to-end.
///
/// A runner carries at most one settings value. Settings can be bound once;
/// binding again fails with [`OperationError::SettingsAssigned`].
#[derive(Debug, Clone)]
pub struct OperationRunner {
    operation: Operation,
    settings: Option<Value>,
}

impl OperationRunner {
    pub(crate) fn new(operation: Operation) -> Self {
        Self {
            operation,
            settings: None,
        }
    }

    /// The operation this runner executes.
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Settings bound to this runner, if any.
    pub fn settings(&self) -> Option<&Value> {
        self.settings.as_ref()
    }

    /// Bind `raw` settings, built through the settings constructor.
    pub fn with(mut self, raw: Value) -> Result<Self, OperationError> {
        if self.settings.is_some() {
            return Err(OperationError::SettingsAssigned {
                operation: self.operation.name().to_string(),
            });
        }
        let settings = self.operation.construct_settings(vec![raw])?;
        self.settings = Some(settings);
        Ok(self)
    }

    /// Run the operation against `input` through the operation's
    /// [`RunStrategy`](crate::RunStrategy).
    pub fn call(&self, input: Value) -> Result<Outcome, OperationError> {
        let op = &self.operation;
        let _span = tracing::debug_span!("railway.operation.call", operation = %op.name()).entered();
        op.strategy().run(self, input)
    }

    /// Run the built-in pipeline on `input`, bypassing the strategy.
    ///
    /// Contract violations while building input, settings, output or error
    /// values are returned as `Err`; only the logic's [`Flow`] decides
    /// between a successful and a failed [`Outcome`].
    pub fn execute(&self, input: Value) -> Result<Outcome, OperationError> {
        let op = &self.operation;
        let input = op.construct_input(input)?;

        let defaults;
        let settings = match &self.settings {
            Some(settings) => Some(settings),
            None => {
                defaults = op.default_settings()?;
                defaults.as_ref()
            }
        };

        #[allow(deprecated)]
        let (args, successful) = match op.logic().call(input, settings)? {
            Flow::Success(args) => (args, true),
            Flow::Fail(args) => (args, false),
            Flow::Return(value) => {
                tracing::warn!(
                    operation = %op.name(),
                    "railway.operation.implicit_return: return Flow::Success or Flow::Fail instead"
                );
                (vec![value], true)
            }
        };

        let value = op.construct_payload(args, successful)?;
        tracing::debug!(operation = %op.name(), successful, "railway.operation.halt");
        Ok(op.wrap(value, successful))
    }
}
