use crate::config::LaunchConfig;
use crate::utils::error::{LauncherError, Result};
use crate::utils::validation::Validate;
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::OnceLock;

impl LaunchConfig {
    /// Reads and parses a launcher TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LauncherError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` if it exists, otherwise returns the built-in defaults.
    /// The result is validated either way.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            tracing::debug!("Loading launcher config from {}", path.display());
            Self::from_file(path)?
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses launcher TOML after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }
}

/// Replaces `${VAR}` with the value of the environment variable. Unknown
/// variables are left as written.
fn substitute_env_vars(content: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([^}]+)\}").expect("env pattern is a valid regex")
    });

    re.replace_all(content, |caps: &Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}
