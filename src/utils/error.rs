use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Profile parse error: {0}")]
    ProfileError(#[from] toml::de::Error),

    #[error("Scrape error: {message}")]
    ScrapeError { message: String },

    #[error("Toolchain error: {message}")]
    ToolchainError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Io,
    Config,
    Toolchain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ToolError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ToolError::HttpError(_) => ErrorCategory::Network,
            ToolError::CsvError(_)
            | ToolError::SerializationError(_)
            | ToolError::ScrapeError { .. } => ErrorCategory::Data,
            ToolError::IoError(_) => ErrorCategory::Io,
            ToolError::ProfileError(_)
            | ToolError::ConfigError { .. }
            | ToolError::MissingConfigError { .. }
            | ToolError::InvalidConfigValueError { .. } => ErrorCategory::Config,
            ToolError::ToolchainError { .. } => ErrorCategory::Toolchain,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Network hiccups are worth a manual retry
            ToolError::HttpError(_) => ErrorSeverity::Medium,
            ToolError::ScrapeError { .. } | ToolError::CsvError(_) => ErrorSeverity::High,
            ToolError::SerializationError(_) => ErrorSeverity::High,
            ToolError::IoError(_) => ErrorSeverity::Critical,
            ToolError::ProfileError(_)
            | ToolError::ConfigError { .. }
            | ToolError::MissingConfigError { .. }
            | ToolError::InvalidConfigValueError { .. } => ErrorSeverity::Medium,
            ToolError::ToolchainError { .. } => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ToolError::HttpError(_) => {
                "Check network connectivity and that the page URL is reachable".to_string()
            }
            ToolError::CsvError(_) => "Check that the output file is writable".to_string(),
            ToolError::IoError(_) => {
                "Check file permissions and available disk space".to_string()
            }
            ToolError::SerializationError(_) => {
                "Check that the report path is writable".to_string()
            }
            ToolError::ProfileError(_) => {
                "Check the profile file for TOML syntax errors".to_string()
            }
            ToolError::ScrapeError { .. } => {
                "The page layout may have changed; inspect the page and adjust the expected columns"
                    .to_string()
            }
            ToolError::ToolchainError { .. } => {
                "Check that the configured C compiler is installed and on PATH".to_string()
            }
            ToolError::ConfigError { .. }
            | ToolError::MissingConfigError { .. }
            | ToolError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ToolError::HttpError(e) => format!("Failed to fetch the page: {}", e),
            ToolError::CsvError(e) => format!("Failed to write CSV output: {}", e),
            ToolError::IoError(e) => format!("File system operation failed: {}", e),
            ToolError::SerializationError(e) => format!("Failed to serialize report: {}", e),
            ToolError::ProfileError(e) => format!("Failed to parse build profile: {}", e),
            ToolError::ScrapeError { message } => format!("Scraping failed: {}", message),
            ToolError::ToolchainError { message } => format!("Toolchain failure: {}", message),
            ToolError::ConfigError { message } => format!("Configuration error: {}", message),
            ToolError::MissingConfigError { field } => {
                format!("Missing configuration field: {}", field)
            }
            ToolError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("Invalid value '{}' for {}: {}", value, field, reason),
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_category_and_severity() {
        let err = ToolError::MissingConfigError {
            field: "tests_dir".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Config);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_toolchain_error_is_high_severity() {
        let err = ToolError::ToolchainError {
            message: "failed to invoke gcc".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Toolchain);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("gcc"));
    }

    #[test]
    fn test_invalid_config_value_message() {
        let err = ToolError::InvalidConfigValueError {
            field: "page_url".to_string(),
            value: "ftp://example.com".to_string(),
            reason: "Unsupported URL scheme: ftp".to_string(),
        };
        let msg = err.user_friendly_message();
        assert!(msg.contains("page_url"));
        assert!(msg.contains("ftp"));
    }
}
