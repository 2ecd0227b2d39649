//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Provides implementations for all CLI commands.
//! Each command is in its own submodule for maintainability.

pub mod check;
pub mod eval;
pub mod transform;

pub use check::{execute_check, CheckOptions};
pub use eval::{execute_eval, EvalOptions};
pub use transform::{execute_transform, TransformCommandOptions};
