//! CLI command implementations.

pub mod args;
pub mod output;
pub mod query;

pub mod delete;
pub mod search;

pub use args::{Cli, Commands};
pub use output::Output;
