pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FilePidStore, SystemProcessControl, TerminalConsole};
pub use config::LaunchConfig;
pub use self::core::{supervisor::Supervisor, termination::terminate_stale};
pub use utils::error::{LauncherError, Result};
