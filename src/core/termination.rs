use crate::config::LaunchConfig;
use crate::domain::model::TerminationReport;
use crate::domain::ports::{PidStore, ProcessControl};

/// Stops whatever is left of the previous launch.
///
/// The recorded child is tried first. Only when nothing tracked was stopped does
/// the name-based kill run, and only if `broad_kill_fallback` allows it. That
/// fallback also stops unrelated processes sharing the image name.
///
/// Never fails: every error is logged at debug level and folded into the report.
pub async fn terminate_stale<P, S>(
    control: &P,
    store: &S,
    config: &LaunchConfig,
) -> TerminationReport
where
    P: ProcessControl + ?Sized,
    S: PidStore,
{
    let mut last_error: Option<String> = None;

    match store.load().await {
        Ok(Some(record)) => match control.terminate_tracked(&record).await {
            Ok(true) => {
                tracing::info!("🔪 Stopped previous instance (PID: {})", record.pid);
                clear_record(store).await;
                return TerminationReport::Tracked { pid: record.pid };
            }
            Ok(false) => {
                tracing::debug!("Recorded PID {} is no longer running", record.pid);
                clear_record(store).await;
            }
            Err(e) => {
                tracing::debug!("Could not stop recorded PID {}: {}", record.pid, e);
                last_error = Some(e.to_string());
            }
        },
        Ok(None) => tracing::debug!("No PID record from a previous launch"),
        Err(e) => {
            tracing::debug!("Ignoring unreadable PID record: {}", e);
            clear_record(store).await;
        }
    }

    if !config.broad_kill_fallback {
        return match last_error {
            Some(reason) => TerminationReport::Failed { reason },
            None => TerminationReport::NothingToTerminate,
        };
    }

    tracing::warn!(
        "⚠️ Falling back to killing every '{}' process; unrelated processes with that name are stopped too",
        config.image_name
    );

    match control.terminate_by_name(&config.image_name).await {
        Ok(0) => match last_error {
            // the recorded instance may still be running
            Some(reason) => TerminationReport::Failed { reason },
            None => TerminationReport::NothingToTerminate,
        },
        Ok(killed) => {
            tracing::info!("🔪 Killed {} '{}' process(es)", killed, config.image_name);
            TerminationReport::ByName { killed }
        }
        Err(e) => {
            tracing::debug!("Name-based termination failed: {}", e);
            let reason = match last_error {
                Some(tracked) => format!("{}; {}", tracked, e),
                None => e.to_string(),
            };
            TerminationReport::Failed { reason }
        }
    }
}

async fn clear_record<S: PidStore>(store: &S) {
    if let Err(e) = store.clear().await {
        tracing::debug!("Could not remove PID record: {}", e);
    }
}
