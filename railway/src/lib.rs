#![deny(missing_docs)]
//! # railway: umbrella crate
//!
//! A single import surface for contract-checked operations and the chains
//! that compose them. Re-exports the member crates behind feature flags,
//! plus a `prelude` for the happy path.
//!
//! ```
//! use railway::prelude::*;
//! use serde_json::json;
//!
//! let double = OperationBuilder::passthrough("Double")
//!     .logic_fn(|input, _| Ok(Flow::success(input.as_i64().unwrap_or(0) * 2)))
//!     .finalize()?;
//! let chain = ChainBuilder::new("Quadruple")
//!     .step("first", &double)
//!     .step("second", &double)
//!     .finalize()?;
//!
//! let outcome = chain.call(json!(3))?;
//! assert_eq!(outcome.success(), Some(&json!(12)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(feature = "chain")]
pub use railway_chain;
#[cfg(feature = "core")]
pub use railway_core;
#[cfg(feature = "op")]
pub use railway_op;

/// Happy-path imports for defining operations and chains.
pub mod prelude {
    #[cfg(feature = "core")]
    pub use railway_core::{
        AnyContract, ChainError, ConfigError, Constructor, ConstructorSpec, Contract,
        ContractError, Flow, Logic, LogicFn, NoneContract, OperationError, OperationName,
        Outcome, StepName, Typed,
    };

    #[cfg(feature = "op")]
    pub use railway_op::{Operation, OperationBuilder, OperationRunner, RunStrategy};

    #[cfg(feature = "chain")]
    pub use railway_chain::{
        Around, Chain, ChainBuilder, ChainOutcome, ChainRunStrategy, ChainRunner,
    };
}
