pub mod supervisor;
pub mod termination;

pub use crate::domain::model::{ExitOutcome, Phase, RunReport, TerminationReport};
pub use crate::domain::ports::{Console, PidStore, ProcessControl, SupervisedChild};
pub use crate::utils::error::Result;
