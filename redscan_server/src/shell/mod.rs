//! Process entry: CLI parsing, logging setup, and mode dispatch.

pub mod cli;
pub mod modes;

pub use cli::run;
