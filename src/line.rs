use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::common::*;

/// Where command lines come from. `Ok(None)` means end of input.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

pub struct Terminal {
    editor: DefaultEditor,
}

impl Terminal {
    pub fn new() -> Result<Terminal> {
        Ok(Terminal {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    // editor history only backs arrow-key recall
                    if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                        debug!(error = %e, "editor history entry dropped");
                    }
                    return Ok(Some(line));
                }
                // Ctrl-C drops the partial line
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }
}
