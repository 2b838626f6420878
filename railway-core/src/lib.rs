//! # railway-core: Protocol types for railway-style operations
//!
//! This crate defines the vocabulary shared by every runtime crate in the
//! workspace. It has no execution logic of its own.
//!
//! ## The Pieces
//!
//! | Piece | Types | What it does |
//! |-------|-------|-------------|
//! | ① Contracts | [`Contract`], [`ConstructorSpec`] | Describe and build input/output/error/settings values |
//! | ② Configuration | [`Config`] | Write-once slots, frozen at finalization |
//! | ③ Outcome | [`Outcome`] | Immutable success/failure wrapper |
//! | ④ Logic | [`Logic`], [`Flow`] | User code and the way it signals success or failure |
//! | ⑤ Errors | [`ConfigError`], [`ContractError`], [`OperationError`], [`ChainError`] | Everything that is *not* a business outcome |
//!
//! ## Design Principle
//!
//! Business failures are values, not errors. A [`Logic`] implementation
//! reports a failed business outcome by returning [`Flow::Fail`], which the
//! runner turns into an [`Outcome`] with `successful == false`. The
//! `Err` channel is reserved for contract violations and mis-configuration:
//! things a caller should never have to handle as part of normal control
//! flow.
//!
//! ## Dependency Notes
//!
//! Raw values crossing a contract boundary are `serde_json::Value`. This
//! lets a chain thread the output of one operation into the input of the
//! next without the steps sharing Rust types. Typed payloads go through
//! [`Typed`], which uses serde on both sides.

#![deny(missing_docs)]

pub mod config;
pub mod contract;
pub mod error;
pub mod flow;
pub mod id;
pub mod logic;
pub mod outcome;

#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-exports for convenience
pub use config::Config;
pub use contract::{
    AnyContract, Args, Constructor, ConstructorSpec, Contract, DEFAULT_CONSTRUCTOR, NoneContract,
    Typed,
};
pub use error::{ChainError, ConfigError, ContractError, OperationError};
pub use flow::Flow;
pub use id::{OperationName, StepName};
pub use logic::{Logic, LogicFn};
pub use outcome::{Outcome, OutcomeFields};
