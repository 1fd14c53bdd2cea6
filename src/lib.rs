//! `stage`: a small interactive shell with background jobs.
//!
//! Each prompt cycle reaps finished jobs, reads a line, records it in a ten
//! entry history and either runs a builtin or launches an external program
//! in the foreground or background.

pub mod builtin;
pub mod cli;
pub mod common;
pub mod config;
pub mod history;
pub mod job;
pub mod launch;
pub mod line;
pub mod parse;
pub mod session;
pub mod signal;

pub use cli::Cli;
pub use common::{Result, ShellError};
pub use config::Config;
pub use line::{LineSource, Terminal};
pub use session::{Flow, Session};
