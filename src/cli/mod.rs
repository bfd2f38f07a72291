//! Command line front end
//!
//! Contains the logic behind the `rap2` binary.

pub mod commands;
pub mod prompt;

pub use commands::{Command, run};
pub use prompt::PromptSolver;
