use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::{self, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use std::fmt;
use tracing::{debug, warn};

use crate::parse::ParsedCommand;

#[derive(Debug)]
pub struct Job {
    pub command: ParsedCommand,
    pub pid: Pid,
}

/// How a reaped job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Exited(i32),
    Signaled(Signal),
    /// The OS has no record of the child any more.
    Vanished,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Exited(code) => write!(f, "exit status {}", code),
            JobStatus::Signaled(sig) => write!(f, "killed by {}", sig),
            JobStatus::Vanished => write!(f, "no longer running"),
        }
    }
}

#[derive(Debug)]
pub struct Reaped {
    pub pid: Pid,
    pub command: ParsedCommand,
    pub status: JobStatus,
}

/// Background jobs in launch order. Display indices are positions, so they
/// shift when an earlier job goes away.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: Vec<Job>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, command: ParsedCommand, pid: Pid) {
        debug!(%pid, argv = ?command.argv, "job added");
        self.jobs.push(Job { command, pid });
    }

    pub fn remove(&mut self, pid: Pid) -> Option<Job> {
        let index = self.jobs.iter().position(|job| job.pid == pid)?;
        Some(self.jobs.remove(index))
    }

    pub fn find_by_display_index(&self, index: usize) -> Option<&Job> {
        self.jobs.get(index)
    }

    pub fn list(&self) -> impl Iterator<Item = (usize, Pid, &[String])> + '_ {
        self.jobs
            .iter()
            .enumerate()
            .map(|(i, job)| (i, job.pid, job.command.argv.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Poll every job once without blocking and drop the ones that ended.
    pub fn reap_once(&mut self) -> Vec<Reaped> {
        let mut reaped = Vec::new();
        let mut i = 0;
        while i < self.jobs.len() {
            match poll(self.jobs[i].pid) {
                Some(status) => {
                    let Job { command, pid } = self.jobs.remove(i);
                    debug!(%pid, %status, "job reaped");
                    reaped.push(Reaped {
                        pid,
                        command,
                        status,
                    });
                }
                None => i += 1,
            }
        }
        reaped
    }
}

fn poll(pid: Pid) -> Option<JobStatus> {
    match wait::waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
        Ok(WaitStatus::StillAlive) => None,
        Ok(WaitStatus::Exited(_, code)) => Some(JobStatus::Exited(code)),
        Ok(WaitStatus::Signaled(_, sig, _)) => Some(JobStatus::Signaled(sig)),
        // stop/continue reports: the job is still around
        Ok(_) => None,
        Err(Errno::ECHILD) => Some(JobStatus::Vanished),
        Err(e) => {
            warn!(%pid, error = %e, "waitpid failed");
            None
        }
    }
}
