use thiserror::Error;

#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration file error: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to start '{program}': {source}")]
    SpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Process termination error: {message}")]
    TerminationError { message: String },

    #[error("Console error: {message}")]
    ConsoleError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Process,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LauncherError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LauncherError::ConfigParseError(_) | LauncherError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            LauncherError::SpawnError { .. } | LauncherError::TerminationError { .. } => {
                ErrorCategory::Process
            }
            LauncherError::IoError(_)
            | LauncherError::SerializationError(_)
            | LauncherError::ConsoleError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // termination is best-effort and never stops a launch
            LauncherError::TerminationError { .. } => ErrorSeverity::Low,
            LauncherError::ConsoleError { .. } | LauncherError::SerializationError(_) => {
                ErrorSeverity::Medium
            }
            LauncherError::SpawnError { .. }
            | LauncherError::ConfigParseError(_)
            | LauncherError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            LauncherError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            LauncherError::ConfigParseError(_) => {
                "Check the launcher TOML file for syntax errors".to_string()
            }
            LauncherError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting in the launcher config", field)
            }
            LauncherError::SpawnError { program, .. } => format!(
                "Make sure '{}' is installed and available on PATH",
                program
            ),
            LauncherError::TerminationError { .. } => {
                "Stop the old instance manually if the port is still in use".to_string()
            }
            LauncherError::ConsoleError { .. } => {
                "Run the launcher from an interactive terminal".to_string()
            }
            LauncherError::IoError(_) | LauncherError::SerializationError(_) => {
                "Check file permissions in the working directory".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Launcher configuration is invalid: {}", self),
            ErrorCategory::Process => format!("Could not manage the application process: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, LauncherError>;
