use std::io::Write;

use crate::common::*;
use crate::line::LineSource;
use crate::session::{Flow, Session};

pub struct Cli<L, O, E> {
    source: L,
    session: Session<O, E>,
}

impl<L: LineSource, O: Write, E: Write> Cli<L, O, E> {
    pub fn new(source: L, session: Session<O, E>) -> Self {
        Cli { source, session }
    }

    pub fn session(&self) -> &Session<O, E> {
        &self.session
    }

    /// Prompt until `exit` or end of input, returning the process exit code.
    pub fn go(&mut self) -> Result<i32> {
        if self.session.config().banner {
            self.session.banner()?;
        }
        loop {
            // finished background jobs are announced before the next prompt
            if let Err(e) = self.session.reap() {
                self.session.report(&e);
            }

            let prompt = self.session.prompt();
            let line = match self.source.read_line(&prompt)? {
                Some(line) => line,
                None => return Ok(self.session.end_of_input()),
            };
            if let Flow::Exit(code) = self.session.execute_line(&line)? {
                return Ok(code);
            }
        }
    }
}
