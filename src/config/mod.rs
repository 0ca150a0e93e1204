pub mod toml_config;

use crate::domain::model::CommandSpec;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_app_url, validate_non_empty_string, validate_path, validate_range, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_ENTRY_POINT: &str = "app.py";
pub const DEFAULT_CONFIG_FILE: &str = "launcher.toml";

const MAX_DELAY_SECS: u64 = 300;

/// Everything a launch needs. Built once and handed to the supervisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Image name matched by the name-based fallback kill.
    pub image_name: String,
    pub runtime: String,
    pub runner_args: Vec<String>,
    pub entry_point: String,
    pub host: String,
    pub port: u16,
    pub settle_delay_secs: u64,
    pub shutdown_grace_secs: u64,
    pub pid_file: PathBuf,
    pub broad_kill_fallback: bool,
    pub install_requirements: bool,
    pub requirements_file: PathBuf,
    pub pause_on_exit: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        let image_name = if cfg!(windows) { "python.exe" } else { "python" };
        Self {
            image_name: image_name.to_string(),
            runtime: "python".to_string(),
            runner_args: vec!["-m".to_string(), "streamlit".to_string(), "run".to_string()],
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            settle_delay_secs: 2,
            shutdown_grace_secs: 10,
            pid_file: PathBuf::from(".app-launcher.pid"),
            broad_kill_fallback: true,
            install_requirements: false,
            requirements_file: PathBuf::from("requirements.txt"),
            pause_on_exit: true,
        }
    }
}

impl LaunchConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    /// `runtime runner_args… entry_point --server.port=<port>`
    pub fn launch_command(&self) -> CommandSpec {
        let mut args = self.runner_args.clone();
        args.push(self.entry_point.clone());
        args.push(format!("--server.port={}", self.port));
        CommandSpec::new(self.runtime.clone(), args)
    }

    pub fn install_command(&self) -> CommandSpec {
        CommandSpec::new(
            self.runtime.clone(),
            vec![
                "-m".to_string(),
                "pip".to_string(),
                "install".to_string(),
                "-r".to_string(),
                self.requirements_file.to_string_lossy().into_owned(),
            ],
        )
    }

    pub fn app_url(&self) -> Result<Url> {
        validate_app_url("host", &self.host, self.port)
    }
}

impl Validate for LaunchConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("image_name", &self.image_name)?;
        validate_non_empty_string("runtime", &self.runtime)?;
        validate_path("entry_point", &self.entry_point)?;
        validate_path("pid_file", &self.pid_file.to_string_lossy())?;
        validate_path("requirements_file", &self.requirements_file.to_string_lossy())?;
        validate_range("port", self.port, 1, u16::MAX)?;
        validate_range("settle_delay_secs", self.settle_delay_secs, 0, MAX_DELAY_SECS)?;
        validate_range("shutdown_grace_secs", self.shutdown_grace_secs, 0, MAX_DELAY_SECS)?;
        self.app_url()?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "app-launcher")]
#[command(about = "Stops stale instances and relaunches the local Streamlit app")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct CliConfig {
    /// Path to the launcher TOML file; built-in defaults apply when it is absent
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Accepted and ignored so that stray arguments never change a launch
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub ignored: Vec<String>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Parses `args` without ever exiting. Arguments clap rejects are kept in
    /// `ignored` and the launch proceeds with default settings.
    pub fn parse_lenient<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString>,
    {
        let args: Vec<std::ffi::OsString> = args.into_iter().map(Into::into).collect();
        match Self::try_parse_from(args.clone()) {
            Ok(cli) => cli,
            Err(_) => Self {
                config: DEFAULT_CONFIG_FILE.to_string(),
                verbose: false,
                ignored: args
                    .iter()
                    .skip(1)
                    .map(|arg| arg.to_string_lossy().into_owned())
                    .collect(),
            },
        }
    }
}
