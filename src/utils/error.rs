use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {message}")]
    TomlError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported catalog format: {format}")]
    UnsupportedCatalogFormat { format: String },

    #[error("Invalid market #{index} ({name}): {reason}")]
    InvalidMarket {
        index: usize,
        name: String,
        reason: String,
    },

    #[error("Invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    #[error("Output processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Catalog,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FinderError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FinderError::IoError(_) | FinderError::ProcessingError { .. } => ErrorCategory::Io,
            FinderError::TomlError { .. }
            | FinderError::ConfigError { .. }
            | FinderError::MissingConfigError { .. }
            | FinderError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            FinderError::CsvError(_)
            | FinderError::SerializationError(_)
            | FinderError::UnsupportedCatalogFormat { .. }
            | FinderError::InvalidMarket { .. } => ErrorCategory::Catalog,
            FinderError::InvalidDate { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Catalog => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            FinderError::IoError(_) => "Check that the file exists and is readable",
            FinderError::CsvError(_) => {
                "Check the catalog CSV header: name,address,lat,lng,days"
            }
            FinderError::SerializationError(_) => "Check the catalog JSON syntax",
            FinderError::TomlError { .. } => "Check the TOML syntax of the file",
            FinderError::ConfigError { .. }
            | FinderError::MissingConfigError { .. }
            | FinderError::InvalidConfigValueError { .. } => {
                "Fix the configuration value or pass it on the command line"
            }
            FinderError::UnsupportedCatalogFormat { .. } => {
                "Use a catalog file ending in .csv, .json or .toml"
            }
            FinderError::InvalidMarket { .. } => {
                "Fix the market entry: days must be digits 0-9 and coordinates in range"
            }
            FinderError::InvalidDate { .. } => "Pass the date as YYYY-MM-DD",
            FinderError::ProcessingError { .. } => "Try a different output format",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FinderError::IoError(e) => format!("Could not access a file: {}", e),
            FinderError::InvalidMarket { name, reason, .. } => {
                format!("Market '{}' in the catalog is invalid: {}", name, reason)
            }
            FinderError::InvalidDate { value, .. } => format!("'{}' is not a valid date", value),
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, FinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_category() {
        let err = FinderError::InvalidDate {
            value: "2024-13-01".to_string(),
            reason: "month out of range".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.exit_code(), 2);

        let err = FinderError::InvalidMarket {
            index: 3,
            name: "Moran".to_string(),
            reason: "open days are empty".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Catalog);
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_friendly_message().contains("Moran"));
    }

    #[test]
    fn test_io_error_is_critical() {
        let err: FinderError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "markets.csv").into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
    }
}
