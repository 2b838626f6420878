//! Error types for each layer.
//!
//! None of these represent a business failure. Business failures travel as
//! [`Outcome`](crate::Outcome) values with `successful == false`.

use crate::id::StepName;
use thiserror::Error;

/// Definition-time configuration errors. Raised while building or
/// finalizing an operation or chain, never recovered at call time.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A slot was written twice, or written after the configuration froze.
    #[error("frozen configuration: `{key}` cannot be reconfigured")]
    Frozen {
        /// The slot that was written.
        key: String,
    },

    /// A required slot has no value and no default.
    #[error("missing configuration: `{key}`")]
    Missing {
        /// The slot that is missing.
        key: String,
    },

    /// The definition was finalized more than once.
    #[error("`{name}` is already finalized")]
    AlreadyFinalized {
        /// Name of the definition.
        name: String,
    },

    /// Default settings were declared for a step the chain does not have.
    #[error("unknown step: {step}")]
    UnknownStep {
        /// The step name that did not match.
        step: StepName,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::Missing`].
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing { key: key.into() }
    }

    /// Shorthand for [`ConfigError::Frozen`].
    pub fn frozen(key: impl Into<String>) -> Self {
        Self::Frozen { key: key.into() }
    }
}

/// Contract violations raised while constructing input, output, error or
/// settings values.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ContractError {
    /// The contract does not accept the given arguments at all.
    #[error("{contract} called with arguments ({count} given)")]
    Arguments {
        /// Name of the contract.
        contract: String,
        /// Number of arguments received.
        count: usize,
    },

    /// The arguments were accepted but do not form a valid value.
    #[error("{contract}: {reason}")]
    Invalid {
        /// Name of the contract.
        contract: String,
        /// Why construction failed.
        reason: String,
    },

    /// Catch-all for user-defined contracts.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ContractError {
    /// Shorthand for [`ContractError::Invalid`].
    pub fn invalid(contract: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            contract: contract.into(),
            reason: reason.into(),
        }
    }
}

/// Errors escaping a single operation call.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum OperationError {
    /// Input, output, error or settings construction failed.
    #[error("contract violation: {0}")]
    Contract(#[from] ContractError),

    /// The definition is mis-configured.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Settings were bound to a runner that already had settings.
    #[error("Operation already has settings assigned: {operation}")]
    SettingsAssigned {
        /// Name of the operation.
        operation: String,
    },

    /// Serializing a typed payload failed inside user logic.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all. Include context.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors escaping a chain call.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ChainError {
    /// A step raised instead of returning an outcome.
    #[error("step {step} raised: {source}")]
    Step {
        /// The step that raised.
        step: StepName,
        /// The operation error.
        source: OperationError,
    },

    /// The chain definition is mis-configured.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catch-all, mostly for around hooks.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ChainError {
    /// The step that raised, if the error came from a step.
    pub fn step(&self) -> Option<&StepName> {
        match self {
            Self::Step { step, .. } => Some(step),
            _ => None,
        }
    }
}
