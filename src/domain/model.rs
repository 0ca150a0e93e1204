use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fully resolved command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Identity of a process we spawned, as seen by the OS process table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessIdentity {
    pub pid: u32,
    pub image_name: String,
    /// Seconds since the epoch; `None` when the process table could not report it.
    pub start_time: Option<u64>,
}

/// Persisted record of the last launched child, used to terminate exactly that
/// process on the next run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PidRecord {
    pub pid: u32,
    pub image_name: String,
    pub start_time: Option<u64>,
    pub entry_point: String,
    pub port: u16,
    pub launched_at: DateTime<Utc>,
}

impl PidRecord {
    pub fn new(identity: &ProcessIdentity, entry_point: &str, port: u16) -> Self {
        Self {
            pid: identity.pid,
            image_name: identity.image_name.clone(),
            start_time: identity.start_time,
            entry_point: entry_point.to_string(),
            port,
            launched_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    Exited(i32),
    Signaled(i32),
    /// The operator interrupted the launcher; `code` is the child's own exit code if it had one.
    Interrupted { code: Option<i32> },
    SpawnFailed(String),
    /// The child started but its exit could not be observed.
    WaitFailed(String),
}

impl ExitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExitOutcome::Exited(0))
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitOutcome::Exited(code) => write!(f, "exited with code {}", code),
            ExitOutcome::Signaled(sig) => write!(f, "terminated by signal {}", sig),
            ExitOutcome::Interrupted { code: Some(code) } => {
                write!(f, "stopped by operator (exit code {})", code)
            }
            ExitOutcome::Interrupted { code: None } => write!(f, "stopped by operator"),
            ExitOutcome::SpawnFailed(reason) => write!(f, "failed to start: {}", reason),
            ExitOutcome::WaitFailed(reason) => write!(f, "could not be observed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReport {
    Tracked { pid: u32 },
    ByName { killed: usize },
    NothingToTerminate,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallReport {
    Installed,
    MissingRequirements(String),
    Failed(ExitOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Killing,
    Waiting,
    Installing,
    Launching,
    ChildExited,
    AwaitingKeypress,
    Done,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub phases: Vec<Phase>,
    pub termination: TerminationReport,
    pub install: Option<InstallReport>,
    /// `None` when the launch was skipped because dependency installation failed.
    pub outcome: Option<ExitOutcome>,
}
