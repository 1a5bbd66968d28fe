use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid input for {field}: '{value}' ({reason})")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("No record for course {code} in term {term}")]
    NotFound { code: String, term: String },

    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },

    #[error("Snapshot {path} changed since it was loaded")]
    Conflict { path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfig { field: String },
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        LedgerError::StorageUnavailable {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Storage,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LedgerError {
    pub fn invalid_input(field: &str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        LedgerError::InvalidInput {
            field: field.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            LedgerError::InvalidInput { .. } | LedgerError::NotFound { .. } => ErrorCategory::Input,
            LedgerError::StorageUnavailable { .. }
            | LedgerError::Conflict { .. }
            | LedgerError::Io(_) => ErrorCategory::Storage,
            LedgerError::Serialization(_) | LedgerError::Csv(_) => ErrorCategory::Data,
            LedgerError::ConfigError { .. }
            | LedgerError::InvalidConfigValue { .. }
            | LedgerError::MissingConfig { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LedgerError::InvalidInput { .. } | LedgerError::NotFound { .. } => ErrorSeverity::Low,
            LedgerError::StorageUnavailable { .. } | LedgerError::Conflict { .. } => {
                ErrorSeverity::Medium
            }
            LedgerError::Serialization(_) | LedgerError::Csv(_) | LedgerError::Io(_) => {
                ErrorSeverity::High
            }
            LedgerError::ConfigError { .. }
            | LedgerError::InvalidConfigValue { .. }
            | LedgerError::MissingConfig { .. } => ErrorSeverity::Critical,
        }
    }

    /// Short message meant for the person at the terminal.
    pub fn user_friendly_message(&self) -> String {
        match self {
            LedgerError::InvalidInput { field, reason, .. } => {
                format!("The value given for '{}' was rejected: {}", field, reason)
            }
            LedgerError::NotFound { code, term } => {
                format!("There is no record of {} in term {}", code, term)
            }
            LedgerError::StorageUnavailable { .. } => {
                "The change was NOT saved: the data store could not be reached".to_string()
            }
            LedgerError::Conflict { .. } => {
                "The change was NOT saved: someone else updated the data in the meantime"
                    .to_string()
            }
            LedgerError::Serialization(_) => "The stored data could not be read".to_string(),
            LedgerError::Csv(_) | LedgerError::Io(_) => format!("File operation failed: {}", self),
            LedgerError::ConfigError { .. }
            | LedgerError::InvalidConfigValue { .. }
            | LedgerError::MissingConfig { .. } => format!("Configuration problem: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LedgerError::InvalidInput { .. } => {
                "Credits must be a whole number of at least 1 and the score must lie between 0 and 10"
            }
            LedgerError::NotFound { .. } => "Run `grade-ledger list` to see the recorded courses",
            LedgerError::StorageUnavailable { .. } => {
                "Check the network connection and the access token, then try again"
            }
            LedgerError::Conflict { .. } => "Run the command again to reload the latest data",
            LedgerError::Serialization(_) => "Inspect the snapshot file for malformed JSON",
            LedgerError::Csv(_) | LedgerError::Io(_) => {
                "Check that the path exists and is writable"
            }
            LedgerError::ConfigError { .. }
            | LedgerError::InvalidConfigValue { .. }
            | LedgerError::MissingConfig { .. } => {
                "Fix the configuration file or set GITHUB_TOKEN and REPO_NAME"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
