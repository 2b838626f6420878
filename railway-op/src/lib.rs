#![deny(missing_docs)]
//! Operations: one unit of business logic behind enforced contracts.
//!
//! An [`Operation`] is defined once with an [`OperationBuilder`] and
//! locked with [`OperationBuilder::finalize`]. Finalized operations are
//! immutable, cheap to clone and safe to share across threads.
//!
//! Each call goes through an [`OperationRunner`]:
//!
//! 1. the raw input passes through the input constructor,
//! 2. the [`Logic`](railway_core::Logic) body runs with the constructed
//!    input and the bound settings (or the declared default settings),
//! 3. the returned [`Flow`](railway_core::Flow) picks the output or error
//!    contract, which builds the payload,
//! 4. the result constructor wraps the payload in an
//!    [`Outcome`](railway_core::Outcome).
//!
//! A definition may replace how those stages are driven with its own
//! [`RunStrategy`]; the default, [`StandardRun`], runs them as listed.
//!
//! Contract violations propagate as `Err`; they are never folded into a
//! failed outcome.

mod builder;
mod operation;
mod runner;
mod strategy;

pub use builder::{OperationBuilder, ResultConstructor};
pub use operation::Operation;
pub use runner::OperationRunner;
pub use strategy::{RunStrategy, RunStrategyFn, StandardRun};
