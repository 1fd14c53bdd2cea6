use nix::sys::signal;
use nix::unistd::Pid;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::builtin::{self, Builtin};
use crate::common::*;
use crate::config::Config;
use crate::history::{HistoryRing, RECALL_SIGIL};
use crate::job::JobRegistry;
use crate::launch;
use crate::parse::{self, ParsedCommand};

/// What the main loop should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(i32),
}

/// Shell state for one run: history, background jobs and the streams
/// builtins write to.
pub struct Session<O, E> {
    config: Config,
    history: HistoryRing,
    jobs: JobRegistry,
    out: O,
    err: E,
}

impl<O: Write, E: Write> Session<O, E> {
    pub fn new(config: Config, out: O, err: E) -> Self {
        Session {
            config,
            history: HistoryRing::new(),
            jobs: JobRegistry::new(),
            out,
            err,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    pub fn jobs(&self) -> &JobRegistry {
        &self.jobs
    }

    pub fn out(&self) -> &O {
        &self.out
    }

    pub fn err(&self) -> &E {
        &self.err
    }

    pub fn prompt(&self) -> String {
        let cwd = env::current_dir()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|_| "?".to_owned());
        if self.config.color_prompt {
            format!("\x1b[32m{}\x1b[36m:> \x1b[0m", cwd)
        } else {
            format!("{}:> ", cwd)
        }
    }

    pub fn banner(&mut self) -> Result<()> {
        writeln!(self.out, "Run help for help")?;
        Ok(())
    }

    /// One non-blocking pass over the background jobs, announcing each one
    /// that has finished.
    pub fn reap(&mut self) -> Result<()> {
        for done in self.jobs.reap_once() {
            writeln!(
                self.out,
                "Process {} ({}) has ended: {}",
                done.pid,
                done.command.argv.join(" "),
                done.status
            )?;
        }
        Ok(())
    }

    /// Run one line typed at the prompt. Errors that only affect this line
    /// are printed to the error stream and the session carries on.
    pub fn execute_line(&mut self, line: &str) -> Result<Flow> {
        match self.run_line(line) {
            Ok(flow) => Ok(flow),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                self.report(&e);
                Ok(Flow::Continue)
            }
        }
    }

    /// Input ran out. Jobs still running are left to themselves.
    pub fn end_of_input(&mut self) -> i32 {
        if !self.jobs.is_empty() {
            debug!(jobs = self.jobs.len(), "end of input with background jobs");
        }
        let _ = writeln!(self.out);
        0
    }

    pub fn report(&mut self, e: &ShellError) {
        let _ = writeln!(self.err, "stage: {}", e);
    }

    fn run_line(&mut self, line: &str) -> Result<Flow> {
        let mut line = line.to_owned();
        let mut recalled = false;
        loop {
            self.history.record(&line);
            let cmd = parse::parse(&line)?;
            let flow = match Builtin::from_token(cmd.program()) {
                Builtin::Recall => {
                    if recalled {
                        return Err(ShellError::NestedRecall);
                    }
                    recalled = true;
                    line = self.recall(&cmd).to_owned();
                    writeln!(self.out, "{}", line)?;
                    continue;
                }
                Builtin::Exit => self.exit()?,
                Builtin::Cd => {
                    self.cd(cmd.args())?;
                    Flow::Continue
                }
                Builtin::History => {
                    self.print_history()?;
                    Flow::Continue
                }
                Builtin::Jobs => {
                    self.list_jobs()?;
                    Flow::Continue
                }
                Builtin::Kill => {
                    self.kill(cmd.args())?;
                    Flow::Continue
                }
                Builtin::Help => {
                    write!(self.out, "{}", builtin::help_text())?;
                    Flow::Continue
                }
                Builtin::None => {
                    self.run_external(cmd)?;
                    Flow::Continue
                }
            };
            return Ok(flow);
        }
    }

    fn recall(&self, cmd: &ParsedCommand) -> &str {
        let index = cmd
            .program()
            .and_then(|token| token.strip_prefix(RECALL_SIGIL))
            .and_then(|n| n.parse::<i64>().ok())
            .unwrap_or(0);
        self.history.recall(index)
    }

    fn exit(&mut self) -> Result<Flow> {
        if !self.jobs.is_empty() {
            writeln!(self.out, "There are background processes running")?;
            return Ok(Flow::Continue);
        }
        Ok(Flow::Exit(0))
    }

    fn cd(&mut self, args: &[String]) -> Result<()> {
        let target = match args.first() {
            Some(path) => PathBuf::from(path),
            None => home_dir().ok_or(ShellError::NoHome)?,
        };
        env::set_current_dir(&target).map_err(|source| ShellError::ChangeDir {
            path: target.clone(),
            source,
        })?;
        debug!(dir = %target.display(), "changed directory");
        Ok(())
    }

    fn print_history(&mut self) -> Result<()> {
        for (slot, line) in self.history.list() {
            writeln!(self.err, "{} {}", slot, line)?;
        }
        Ok(())
    }

    fn list_jobs(&mut self) -> Result<()> {
        if self.jobs.is_empty() {
            writeln!(self.out, "There are no background jobs running")?;
            return Ok(());
        }
        for (index, pid, argv) in self.jobs.list() {
            write!(self.out, "[{}]\tpid: {}\t", index, pid)?;
            for arg in argv {
                write!(self.out, " {}", arg)?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }

    /// `kill %n` targets the job listed as `[n]`, `kill <pid>` any process.
    /// The job stays registered until a later reap notices it is gone.
    fn kill(&mut self, args: &[String]) -> Result<()> {
        let arg = args.first().ok_or(ShellError::MissingArgument("kill"))?;
        let invalid = || ShellError::InvalidArgument {
            builtin: "kill",
            arg: arg.clone(),
        };
        let pid = match arg.strip_prefix('%') {
            Some(index) => {
                let index: usize = index.parse().map_err(|_| invalid())?;
                self.jobs
                    .find_by_display_index(index)
                    .ok_or(ShellError::NoSuchJob(index))?
                    .pid
            }
            None => match arg.parse::<i32>() {
                Ok(raw) if raw > 0 => Pid::from_raw(raw),
                _ => return Err(invalid()),
            },
        };
        let sig = self.config.kill_signal;
        signal::kill(pid, sig).map_err(|source| ShellError::Signal { pid, source })?;
        debug!(%pid, signal = %sig, "signal sent");
        Ok(())
    }

    fn run_external(&mut self, cmd: ParsedCommand) -> Result<()> {
        if cmd.program().is_none() {
            return Ok(());
        }
        let mut child = launch::spawn(&cmd)?;
        let pid = Pid::from_raw(child.id() as i32);
        if cmd.background {
            writeln!(self.out, "[{}] {}", self.jobs.len(), pid)?;
            self.jobs.insert(cmd, pid);
        } else {
            let status = child.wait().map_err(ShellError::Wait)?;
            if !status.success() {
                debug!(%pid, %status, "foreground command failed");
            }
        }
        Ok(())
    }
}

fn home_dir() -> Option<PathBuf> {
    match env::var_os("HOME") {
        Some(home) if !home.is_empty() => Some(PathBuf::from(home)),
        _ => {
            warn!("HOME is not set, asking the platform for a home directory");
            dirs::home_dir()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestSession = Session<Vec<u8>, Vec<u8>>;

    fn session() -> TestSession {
        Session::new(Config::quiet(), Vec::new(), Vec::new())
    }

    fn stdout(sh: &TestSession) -> String {
        String::from_utf8_lossy(sh.out()).into_owned()
    }

    fn stderr(sh: &TestSession) -> String {
        String::from_utf8_lossy(sh.err()).into_owned()
    }

    #[test]
    fn builtin_lines_are_recorded() {
        let mut sh = session();
        for line in ["help", "jobs", "history"] {
            assert_eq!(sh.execute_line(line).unwrap(), Flow::Continue);
        }
        assert_eq!(sh.history().recall(0), "history");
        assert_eq!(sh.history().recall(2), "help");
    }

    #[test]
    fn history_goes_to_stderr() {
        let mut sh = session();
        sh.execute_line("help").unwrap();
        sh.execute_line("history").unwrap();
        let err = stderr(&sh);
        let lines: Vec<_> = err.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "0 history");
        assert_eq!(lines[1], "1 help");
        assert_eq!(lines[9], "9 ");
        assert!(!stdout(&sh).contains("0 history"));
    }

    #[test]
    fn recall_reruns_and_records_the_entry() {
        let mut sh = session();
        sh.execute_line("jobs").unwrap();
        sh.execute_line("help").unwrap();
        sh.execute_line("!1").unwrap();

        let out = stdout(&sh);
        let no_jobs = "There are no background jobs running";
        assert_eq!(out.matches(no_jobs).count(), 2);
        assert!(out.contains("jobs\nThere are no background jobs running\n"));
        assert_eq!(sh.history().recall(0), "jobs");
        assert_eq!(sh.history().recall(1), "help");
    }

    #[test]
    fn recall_with_bad_index_uses_newest() {
        let mut sh = session();
        sh.execute_line("help").unwrap();
        sh.execute_line("jobs").unwrap();
        for line in ["!-4", "!abc", "!", "!99"] {
            sh.execute_line(line).unwrap();
            assert_eq!(sh.history().recall(0), "jobs");
        }
        assert_eq!(sh.history().recall(1), "jobs");
        assert!(stderr(&sh).is_empty());
    }

    #[test]
    fn recall_of_a_recall_is_refused() {
        let mut sh = session();
        sh.execute_line(" !0").unwrap();
        assert!(stderr(&sh).contains("history entry is itself a recall"));
    }

    #[test]
    fn exit_without_jobs_ends_session() {
        let mut sh = session();
        assert_eq!(sh.execute_line("exit").unwrap(), Flow::Exit(0));
        assert_eq!(sh.execute_line("exitfoo").unwrap(), Flow::Exit(0));
    }

    #[test]
    fn exit_with_jobs_is_refused() {
        let mut sh = session();
        sh.jobs
            .insert(parse::parse("sleep 100").unwrap(), Pid::from_raw(1 << 30));
        assert_eq!(sh.execute_line("exit").unwrap(), Flow::Continue);
        assert!(stdout(&sh).contains("There are background processes running"));
        assert_eq!(sh.jobs().len(), 1);
    }

    #[test]
    fn empty_jobs_message_only() {
        let mut sh = session();
        sh.execute_line("jobs").unwrap();
        assert_eq!(stdout(&sh), "There are no background jobs running\n");
        assert!(stderr(&sh).is_empty());
        assert!(sh.jobs().is_empty());
    }

    #[test]
    fn jobs_listing_format() {
        let mut sh = session();
        sh.jobs
            .insert(parse::parse("sleep 5 &").unwrap(), Pid::from_raw(1 << 30));
        sh.jobs
            .insert(parse::parse("yes").unwrap(), Pid::from_raw(1 << 30 | 1));
        sh.execute_line("jobs").unwrap();
        assert_eq!(
            stdout(&sh),
            format!(
                "[0]\tpid: {}\t sleep 5\n[1]\tpid: {}\t yes\n",
                1 << 30,
                1 << 30 | 1
            )
        );
    }

    #[test]
    fn kill_rejects_bad_arguments() {
        let mut sh = session();
        for line in ["kill", "kill abc", "kill 0", "kill -1", "kill %x", "kill %3"] {
            assert_eq!(sh.execute_line(line).unwrap(), Flow::Continue);
        }
        let err = stderr(&sh);
        assert_eq!(err.lines().count(), 6);
        assert!(err.contains("usage: kill"));
        assert!(err.contains("argument must be a PID or %jobid, got `abc`"));
        assert!(err.contains("kill: %3: no such job"));
    }

    #[test]
    fn parse_failure_is_reported_but_recorded() {
        let mut sh = session();
        assert_eq!(sh.execute_line("ls | wc").unwrap(), Flow::Continue);
        assert!(stderr(&sh).contains("stage: failed to parse command"));
        assert_eq!(sh.history().recall(0), "ls | wc");
    }

    #[test]
    fn blank_line_does_nothing() {
        let mut sh = session();
        assert_eq!(sh.execute_line("   ").unwrap(), Flow::Continue);
        assert!(stdout(&sh).is_empty());
        assert!(stderr(&sh).is_empty());
    }

    #[test]
    fn unknown_command_keeps_running() {
        let mut sh = session();
        let flow = sh.execute_line("no-such-program-stage-test").unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(
            stderr(&sh),
            "stage: no-such-program-stage-test: command not found\n"
        );
    }

    #[test]
    fn prompt_shows_cwd() {
        let sh = session();
        let cwd = env::current_dir().unwrap();
        assert_eq!(sh.prompt(), format!("{}:> ", cwd.display()));

        let colored = Session::new(Config::default(), Vec::new(), Vec::new());
        let prompt = colored.prompt();
        assert!(prompt.starts_with("\x1b[32m"));
        assert!(prompt.contains(&cwd.display().to_string()));
        assert!(prompt.ends_with(":> \x1b[0m"));
    }
}
