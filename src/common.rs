use nix::unistd::Pid;
use std::io;
use std::path::PathBuf;

use crate::parse::ParseError;

pub type Result<T> = std::result::Result<T, ShellError>;

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("failed to parse command: {0}")]
    Parse(#[from] ParseError),

    #[error("cd: {}: {source}", path.display())]
    ChangeDir { path: PathBuf, source: io::Error },

    #[error("cd: HOME not set")]
    NoHome,

    #[error("{}: {source}", path.display())]
    Redirect { path: PathBuf, source: io::Error },

    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("{program}: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("wait: {0}")]
    Wait(io::Error),

    #[error("{builtin}: argument must be a PID or %jobid, got `{arg}`")]
    InvalidArgument { builtin: &'static str, arg: String },

    #[error("{0}: usage: kill <pid> | kill %<job>")]
    MissingArgument(&'static str),

    #[error("kill: %{0}: no such job")]
    NoSuchJob(usize),

    #[error("!: history entry is itself a recall")]
    NestedRecall,

    #[error("kill: ({pid}): {source}")]
    Signal { pid: Pid, source: nix::Error },

    #[error("sigaction: {0}")]
    SignalSetup(nix::Error),

    #[error("readline: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ShellError {
    /// Errors that end the session rather than just the current line.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Readline(_) | ShellError::SignalSetup(_))
    }
}
