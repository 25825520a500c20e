//! Operator tooling for the workspace cluster registry.
//!
//! The `wscctl` binary wires configuration, logging and the database pool
//! together and hands each parsed command to [`commands::execute_command`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

pub use cli::{Args, Command, OutputFormat};
pub use commands::{execute_command, CommandContext};
pub use config::Config;
