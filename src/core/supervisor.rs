use crate::config::LaunchConfig;
use crate::core::termination::terminate_stale;
use crate::domain::model::{ExitOutcome, InstallReport, Phase, PidRecord, RunReport};
use crate::domain::ports::{Console, PidStore, ProcessControl};
use std::path::Path;

const RULE_WIDTH: usize = 50;

/// Runs one launch: kill, settle, (install), launch, pause.
///
/// Steps run strictly in order and none of them can abort the sequence, so
/// every run ends in [`Phase::Done`].
pub struct Supervisor<P: ProcessControl, S: PidStore, C: Console> {
    control: P,
    store: S,
    console: C,
    config: LaunchConfig,
}

impl<P: ProcessControl, S: PidStore, C: Console> Supervisor<P, S, C> {
    pub fn new(control: P, store: S, console: C, config: LaunchConfig) -> Self {
        Self {
            control,
            store,
            console,
            config,
        }
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    pub async fn run(&self) -> RunReport {
        let mut phases = vec![Phase::Start];

        self.enter(&mut phases, Phase::Killing);
        self.console.say("Stopping stale application instances...");
        let termination = terminate_stale(&self.control, &self.store, &self.config).await;

        self.enter(&mut phases, Phase::Waiting);
        self.console.say(&format!(
            "Waiting {}s for resources to be released...",
            self.config.settle_delay_secs
        ));
        tokio::time::sleep(self.config.settle_delay()).await;

        let install = if self.config.install_requirements {
            self.enter(&mut phases, Phase::Installing);
            Some(self.install().await)
        } else {
            None
        };

        let outcome = match &install {
            Some(report) if *report != InstallReport::Installed => {
                tracing::warn!("Skipping launch: {:?}", report);
                None
            }
            _ => {
                self.enter(&mut phases, Phase::Launching);
                let outcome = self.launch().await;
                self.enter(&mut phases, Phase::ChildExited);
                Some(outcome)
            }
        };

        match &outcome {
            Some(outcome) => self
                .console
                .say(&format!("👋 Application {}", outcome)),
            None => self.console.say("❌ Application was not started"),
        }

        if self.config.pause_on_exit {
            self.enter(&mut phases, Phase::AwaitingKeypress);
            if let Err(e) = self.console.wait_for_acknowledgement().await {
                tracing::debug!("Exit pause ended early: {}", e);
            }
        }

        self.enter(&mut phases, Phase::Done);

        RunReport {
            phases,
            termination,
            install,
            outcome,
        }
    }

    fn enter(&self, phases: &mut Vec<Phase>, phase: Phase) {
        tracing::debug!("Launcher phase: {:?}", phase);
        phases.push(phase);
    }

    async fn install(&self) -> InstallReport {
        let requirements = &self.config.requirements_file;
        if !requirements.exists() {
            let path = requirements.display().to_string();
            self.console
                .say(&format!("❌ Requirements file not found: {}", path));
            return InstallReport::MissingRequirements(path);
        }

        let command = self.config.install_command();
        self.console.say("📦 Installing dependencies...");
        tracing::info!("Running: {}", command);

        let outcome = match self.control.spawn(&command).await {
            Ok(mut child) => child
                .wait()
                .await
                .unwrap_or_else(|e| ExitOutcome::WaitFailed(e.to_string())),
            Err(e) => ExitOutcome::SpawnFailed(e.to_string()),
        };

        if outcome.is_success() {
            self.console.say("✅ Dependencies installed");
            InstallReport::Installed
        } else {
            self.console
                .say(&format!("❌ Dependency installation {}", outcome));
            InstallReport::Failed(outcome)
        }
    }

    async fn launch(&self) -> ExitOutcome {
        let command = self.config.launch_command();

        if !Path::new(&self.config.entry_point).exists() {
            tracing::warn!(
                "Entry point '{}' not found in the working directory",
                self.config.entry_point
            );
        }

        self.print_banner();
        tracing::info!("Running: {}", command);

        let mut child = match self.control.spawn(&command).await {
            Ok(child) => child,
            Err(e) => {
                tracing::error!("❌ Launch failed: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                self.console.say(&format!("❌ {}", e.user_friendly_message()));
                return ExitOutcome::SpawnFailed(e.to_string());
            }
        };

        let identity = child.identity();
        let record = PidRecord::new(&identity, &self.config.entry_point, self.config.port);
        if let Err(e) = self.store.save(&record).await {
            tracing::warn!("Could not record PID {}: {}", identity.pid, e);
        }

        let outcome = match child.wait().await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Lost track of PID {}: {}", identity.pid, e);
                ExitOutcome::WaitFailed(e.to_string())
            }
        };
        tracing::info!("Application {}", outcome);

        if let Err(e) = self.store.clear().await {
            tracing::debug!("Could not remove PID record: {}", e);
        }

        outcome
    }

    fn print_banner(&self) {
        let url = match self.config.app_url() {
            Ok(url) => url.to_string(),
            Err(_) => format!("http://{}:{}", self.config.host, self.config.port),
        };
        let rule = "=".repeat(RULE_WIDTH);

        self.console.say(&rule);
        self.console
            .say(&format!("🚀 Starting {}", self.config.entry_point));
        self.console.say(&format!("🌐 App URL: {}", url));
        self.console.say("💡 Press Ctrl+C to stop the application");
        self.console.say(&rule);
    }
}
