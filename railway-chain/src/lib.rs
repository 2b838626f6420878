#![deny(missing_docs)]
//! Chains: ordered pipelines of operations with railway-style
//! short-circuiting.
//!
//! A [`Chain`] is defined with a [`ChainBuilder`]: named steps, an optional
//! [`Around`] hook, an optional chain result constructor and optional
//! default settings per step. [`ChainBuilder::finalize`] finalizes every
//! step operation and locks the chain.
//!
//! Running a chain threads one value through the steps. Each step's
//! success payload becomes the next step's input; the first failed outcome
//! stops the run. The resulting [`ChainOutcome`] carries the last step
//! executed, so callers can tell which step failed without inspecting an
//! error.
//!
//! Steps that already ran are not undone when a later step fails. Undoing
//! side effects is the around hook's job.
//!
//! How the steps are driven is itself a slot: a chain may set its own
//! [`ChainRunStrategy`] in place of [`StandardChainRun`].

mod around;
mod builder;
mod chain;
mod outcome;
mod runner;
mod strategy;

pub use around::{Around, AroundFn};
pub use builder::{ChainBuilder, ChainResultConstructor, StepSource};
pub use chain::{Chain, ChainCall, Step};
pub use outcome::ChainOutcome;
pub use runner::ChainRunner;
pub use strategy::{ChainRunStrategy, ChainRunStrategyFn, StandardChainRun};
