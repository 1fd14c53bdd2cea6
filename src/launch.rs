use std::fs::File;
use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, Stdio};
use tracing::debug;

use crate::common::*;
use crate::parse::ParsedCommand;

/// Spawn `cmd` with its redirections applied. Redirect targets are opened
/// here, in the shell, so a bad path is reported before anything runs; the
/// opened files are handed to the child and never touch the shell's own
/// streams. Background commands get their own process group so terminal
/// interrupts only reach the foreground.
pub fn spawn(cmd: &ParsedCommand) -> Result<Child> {
    let program = match cmd.program() {
        Some(p) => p,
        None => return Err(ShellError::CommandNotFound(String::new())),
    };
    let mut command = Command::new(program);
    command.args(cmd.args());

    if let Some(path) = &cmd.input {
        let file = File::open(path).map_err(|source| ShellError::Redirect {
            path: path.clone(),
            source,
        })?;
        command.stdin(Stdio::from(file));
    }
    if let Some(path) = &cmd.output {
        let file = File::create(path).map_err(|source| ShellError::Redirect {
            path: path.clone(),
            source,
        })?;
        command.stdout(Stdio::from(file));
    }
    if cmd.background {
        // a job outside the terminal's group would stop on its first read
        if cmd.input.is_none() {
            command.stdin(Stdio::null());
        }
        command.process_group(0);
    }

    let child = command.spawn().map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ShellError::CommandNotFound(program.to_owned()),
        _ => ShellError::Spawn {
            program: program.to_owned(),
            source,
        },
    })?;
    debug!(pid = child.id(), argv = ?cmd.argv, background = cmd.background, "spawned");
    Ok(child)
}
