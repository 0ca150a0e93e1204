use app_launcher::utils::logger;
use app_launcher::{
    CliConfig, FilePidStore, LaunchConfig, Supervisor, SystemProcessControl, TerminalConsole,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse_lenient(std::env::args_os());

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting app-launcher");
    if !cli.ignored.is_empty() {
        tracing::debug!("Ignoring extra arguments: {:?}", cli.ignored);
    }

    let config = match LaunchConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(
                "❌ Configuration failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    tracing::debug!("Launch config: {:?}", config);

    let control = SystemProcessControl::new(config.shutdown_grace());
    let store = FilePidStore::new(config.pid_file.clone());
    let supervisor = Supervisor::new(control, store, TerminalConsole, config);

    let report = supervisor.run().await;
    tracing::debug!(
        "Run finished: termination={:?}, outcome={:?}",
        report.termination,
        report.outcome
    );

    Ok(())
}
