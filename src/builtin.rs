use crate::history::{HISTORY_SIZE, RECALL_SIGIL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Cd,
    History,
    Recall,
    Jobs,
    Kill,
    Help,
    None,
}

impl Builtin {
    /// Decide what the leading token of a command asks for. Keywords match
    /// by prefix, so `exitfoo` is still `Exit`; anything unmatched is an
    /// external program.
    pub fn from_token(token: Option<&str>) -> Builtin {
        let token = match token {
            Some(t) => t,
            None => return Builtin::None,
        };
        if token.starts_with("exit") {
            Builtin::Exit
        } else if token.starts_with("cd") {
            Builtin::Cd
        } else if token.starts_with("history") {
            Builtin::History
        } else if token.starts_with(RECALL_SIGIL) {
            Builtin::Recall
        } else if token.starts_with("jobs") {
            Builtin::Jobs
        } else if token.starts_with("help") {
            Builtin::Help
        } else if token.starts_with("kill") {
            Builtin::Kill
        } else {
            Builtin::None
        }
    }
}

pub fn help_text() -> String {
    format!(
        "Stage built in commands\n\
         exit           -  Exits the shell\n\
         cd <filepath>  -  Changes directory into filepath\n\
         history        -  Lists the last {} commands run\n\
         !<num>         -  Runs the command labeled num in the history output\n\
         jobs           -  Shows a list of all background jobs currently running\n\
         kill <num>     -  Sends SIGKILL to the process with PID num\n\
         kill %<num>    -  Sends SIGKILL to the process labeled num in jobs output\n\
         help           -  Shows the help page\n\n",
        HISTORY_SIZE
    )
}
