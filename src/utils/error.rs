use crate::core::gate::GateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackagesError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Gate(#[from] GateError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Io,
    Purchase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PackagesError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) => ErrorCategory::Io,
            Self::HttpError(_) => ErrorCategory::Network,
            Self::Gate(_) => ErrorCategory::Purchase,
            Self::TomlError(_)
            | Self::SerializationError(_)
            | Self::UrlError(_)
            | Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 使用者已經看過通知，只是流程被擋下
            Self::Gate(_) => ErrorSeverity::Low,
            Self::HttpError(_) => ErrorSeverity::Medium,
            Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("Could not read or write a file: {}", e),
            Self::TomlError(_) => "The configuration file is not valid TOML".to_string(),
            Self::SerializationError(_) => "Could not encode or decode JSON data".to_string(),
            Self::HttpError(_) => "Could not reach the remote endpoint".to_string(),
            Self::UrlError(e) => format!("A configured URL is invalid: {}", e),
            Self::ConfigError { message } => message.clone(),
            Self::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            Self::Gate(e) => e.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::IoError(_) => "Check that the file exists and is readable",
            Self::TomlError(_) => "Check the TOML syntax of the configuration file",
            Self::SerializationError(_) => "Check the shape of the data being exchanged",
            Self::HttpError(_) => "Check the network connection and the relay endpoint",
            Self::UrlError(_) => "Use absolute http(s) URLs in the configuration",
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Fix the reported setting in the configuration file"
            }
            Self::Gate(GateError::GatewayNotConfigured { .. }) => {
                "Fill in the gateway site code and private key"
            }
            Self::Gate(GateError::RegistrationClosed { .. }) => {
                "Registration has closed; move the closing date to reopen it"
            }
            Self::Gate(GateError::UnknownPackage(_)) => {
                "Use one of the configured package identifiers"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PackagesError>;
