use crate::domain::model::{CommandSpec, ExitOutcome, PidRecord, ProcessIdentity};
use crate::domain::ports::{ProcessControl, SupervisedChild};
use crate::utils::error::{LauncherError, Result};
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use sysinfo::{Pid, ProcessesToUpdate, Signal, System};
use tokio::process::{Child, Command};

/// Process control backed by the OS process table (sysinfo) and tokio child processes.
#[derive(Debug, Clone)]
pub struct SystemProcessControl {
    shutdown_grace: Duration,
}

impl SystemProcessControl {
    pub fn new(shutdown_grace: Duration) -> Self {
        Self { shutdown_grace }
    }
}

/// Image names compare case-insensitively and with or without a trailing `.exe`,
/// the way Windows reports them.
pub fn image_matches(process_name: &OsStr, image_name: &str) -> bool {
    normalize_image(&process_name.to_string_lossy()) == normalize_image(image_name)
}

fn normalize_image(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    match lower.strip_suffix(".exe") {
        Some(stem) => stem.to_string(),
        None => lower,
    }
}

fn current_pid() -> Option<Pid> {
    sysinfo::get_current_pid().ok()
}

fn refresh_one(system: &mut System, pid: Pid) {
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
}

#[async_trait]
impl ProcessControl for SystemProcessControl {
    async fn terminate_tracked(&self, record: &PidRecord) -> Result<bool> {
        let pid = Pid::from_u32(record.pid);
        if current_pid() == Some(pid) {
            return Ok(false);
        }

        let mut system = System::new();
        refresh_one(&mut system, pid);

        let Some(process) = system.process(pid) else {
            return Ok(false);
        };

        let same_process = match record.start_time {
            Some(start_time) => process.start_time() == start_time,
            None => image_matches(process.name(), &record.image_name),
        };
        if !same_process {
            tracing::debug!(
                "PID {} now belongs to '{}', not the recorded '{}'",
                record.pid,
                process.name().to_string_lossy(),
                record.image_name
            );
            return Ok(false);
        }

        if process.kill() {
            Ok(true)
        } else {
            Err(LauncherError::TerminationError {
                message: format!("kill request for PID {} was refused", record.pid),
            })
        }
    }

    async fn terminate_by_name(&self, image_name: &str) -> Result<usize> {
        let own_pid = current_pid();
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);

        let mut matched = 0;
        let mut killed = 0;
        for (pid, process) in system.processes() {
            if Some(*pid) == own_pid || !image_matches(process.name(), image_name) {
                continue;
            }
            matched += 1;
            if process.kill() {
                tracing::debug!("Killed '{}' (PID: {})", image_name, pid);
                killed += 1;
            } else {
                tracing::debug!("Could not kill '{}' (PID: {})", image_name, pid);
            }
        }

        if matched > 0 && killed == 0 {
            return Err(LauncherError::TerminationError {
                message: format!(
                    "found {} '{}' process(es) but none could be killed",
                    matched, image_name
                ),
            });
        }
        Ok(killed)
    }

    async fn spawn(&self, command: &CommandSpec) -> Result<Box<dyn SupervisedChild>> {
        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| LauncherError::SpawnError {
                program: command.program.clone(),
                source,
            })?;

        let identity = identify(&child, &command.program);
        tracing::debug!("Spawned {:?}", identity);

        Ok(Box::new(SystemChild {
            child,
            identity,
            shutdown_grace: self.shutdown_grace,
        }))
    }
}

fn identify(child: &Child, program: &str) -> ProcessIdentity {
    let fallback_name = Path::new(program)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.to_string());

    let Some(raw_pid) = child.id() else {
        return ProcessIdentity {
            pid: 0,
            image_name: fallback_name,
            start_time: None,
        };
    };

    let pid = Pid::from_u32(raw_pid);
    let mut system = System::new();
    refresh_one(&mut system, pid);

    match system.process(pid) {
        Some(process) => ProcessIdentity {
            pid: raw_pid,
            image_name: process.name().to_string_lossy().into_owned(),
            start_time: Some(process.start_time()),
        },
        None => ProcessIdentity {
            pid: raw_pid,
            image_name: fallback_name,
            start_time: None,
        },
    }
}

pub struct SystemChild {
    child: Child,
    identity: ProcessIdentity,
    shutdown_grace: Duration,
}

impl SystemChild {
    fn forward_interrupt(&self) {
        let pid = Pid::from_u32(self.identity.pid);
        let mut system = System::new();
        refresh_one(&mut system, pid);

        match system.process(pid).and_then(|p| p.kill_with(Signal::Interrupt)) {
            Some(true) => tracing::debug!("Forwarded interrupt to PID {}", pid),
            _ => tracing::debug!(
                "Could not forward interrupt to PID {}, waiting up to {:?}",
                pid,
                self.shutdown_grace
            ),
        }
    }
}

#[async_trait]
impl SupervisedChild for SystemChild {
    fn identity(&self) -> ProcessIdentity {
        self.identity.clone()
    }

    async fn wait(&mut self) -> Result<ExitOutcome> {
        tokio::select! {
            status = self.child.wait() => Ok(outcome_from_status(status?)),
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    tracing::debug!("Interrupt listener unavailable: {}", e);
                    let status = self.child.wait().await?;
                    return Ok(outcome_from_status(status));
                }

                tracing::info!("🛑 Interrupt received, stopping application");
                self.forward_interrupt();

                match tokio::time::timeout(self.shutdown_grace, self.child.wait()).await {
                    Ok(status) => Ok(ExitOutcome::Interrupted { code: status?.code() }),
                    Err(_) => {
                        tracing::warn!(
                            "Application still running after {:?}, killing PID {}",
                            self.shutdown_grace,
                            self.identity.pid
                        );
                        self.child.kill().await?;
                        Ok(ExitOutcome::Interrupted { code: None })
                    }
                }
            }
        }
    }
}

pub fn outcome_from_status(status: ExitStatus) -> ExitOutcome {
    if let Some(code) = status.code() {
        return ExitOutcome::Exited(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return ExitOutcome::Signaled(signal);
        }
    }

    ExitOutcome::Exited(-1)
}
