use crate::domain::model::{CommandSpec, ExitOutcome, PidRecord, ProcessIdentity};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait PidStore: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<Option<PidRecord>>> + Send;
    fn save(&self, record: &PidRecord) -> impl std::future::Future<Output = Result<()>> + Send;
    fn clear(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Access to the OS process table and process creation.
#[async_trait]
pub trait ProcessControl: Send + Sync {
    /// Kills the process in `record` if it is still the one that was recorded.
    /// Returns `false` when no such process is alive.
    async fn terminate_tracked(&self, record: &PidRecord) -> Result<bool>;

    /// Kills every process whose image name matches, except the caller itself.
    async fn terminate_by_name(&self, image_name: &str) -> Result<usize>;

    /// Starts `command` with inherited stdio.
    async fn spawn(&self, command: &CommandSpec) -> Result<Box<dyn SupervisedChild>>;
}

#[async_trait]
pub trait SupervisedChild: Send {
    fn identity(&self) -> ProcessIdentity;

    /// Blocks until the child exits, forwarding an operator interrupt to it.
    async fn wait(&mut self) -> Result<ExitOutcome>;
}

#[async_trait]
pub trait Console: Send + Sync {
    fn say(&self, line: &str);

    async fn wait_for_acknowledgement(&self) -> Result<()>;
}
