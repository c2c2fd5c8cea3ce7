//! The `district` command line front end.

mod app;
mod cli;
mod commands;
mod error;
pub mod logger;
pub mod render;

#[cfg(test)]
mod tests;

pub use app::App;
pub use cli::Cli;
pub use commands::Commands;
pub use error::{CliError, Result};
