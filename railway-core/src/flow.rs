//! How user logic signals the end of an operation.

use crate::contract::Args;
use serde_json::Value;

/// The halting signal returned by [`Logic::call`](crate::Logic::call).
///
/// `Success` and `Fail` carry raw arguments for the output or error
/// contract. When a single argument already conforms to the contract it is
/// used as-is; otherwise the contract's constructor runs over all of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Halt with a successful outcome.
    Success(Args),
    /// Halt with a failed outcome.
    Fail(Args),
    /// Legacy implicit return: the logic produced a bare value without
    /// choosing an outcome. The runner logs a warning and treats it as
    /// `Success`.
    #[deprecated(note = "return Flow::Success or Flow::Fail explicitly")]
    Return(Value),
}

impl Flow {
    /// Succeed with one payload.
    pub fn success(value: impl Into<Value>) -> Self {
        Self::Success(vec![value.into()])
    }

    /// Succeed with raw constructor arguments.
    pub fn success_with(args: Args) -> Self {
        Self::Success(args)
    }

    /// Fail with one payload.
    pub fn fail(value: impl Into<Value>) -> Self {
        Self::Fail(vec![value.into()])
    }

    /// Fail with raw constructor arguments.
    pub fn fail_with(args: Args) -> Self {
        Self::Fail(args)
    }

    /// Whether this flow ends in success, counting the legacy return.
    #[allow(deprecated)]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Return(_))
    }
}
