//! Error handling for niche-forge

use thiserror::Error;

/// Main error type for niche-forge
#[derive(Error, Debug, Clone)]
pub enum NicheForgeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("LLM provider error ({provider}): {message}")]
    LlmProvider {
        provider: String,
        message: String,
        status_code: Option<u16>,
    },

    #[error("Registrar error for '{domain}': {message}")]
    Registrar {
        domain: String,
        message: String,
        status_code: Option<u16>,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Timeout error: {operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl NicheForgeError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an LLM provider error
    pub fn llm_provider(
        provider: impl Into<String>,
        message: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self::LlmProvider {
            provider: provider.into(),
            message: message.into(),
            status_code,
        }
    }

    /// Create a registrar error
    pub fn registrar(
        domain: impl Into<String>,
        message: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self::Registrar {
            domain: domain.into(),
            message: message.into(),
            status_code,
        }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_secs,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status attached to the failure, if the collaborator answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::LlmProvider { status_code, .. }
            | Self::Registrar { status_code, .. }
            | Self::Network { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Whether the failure happened on the wire rather than in our own handling
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Timeout { .. } | Self::LlmProvider { .. } | Self::Registrar { .. }
        )
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your .env file or environment variables", message)
            }
            Self::LlmProvider { provider, message, .. } => {
                format!("❌ LLM provider ({}) error: {}\n💡 Check your API key and rate limits", provider, message)
            }
            Self::Registrar { domain, message, .. } => {
                format!("⚠️  Could not check '{}' with the registrar: {}\n💡 Verify NAMECOM_USERNAME and NAMECOM_TOKEN", domain, message)
            }
            Self::Network { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!("❌ Network error{}: {}\n💡 Check your internet connection", status, message)
            }
            Self::Timeout { operation, timeout_secs } => {
                format!("⏱️  Operation '{}' timed out after {}s\n💡 Try again or lower the retry count", operation, timeout_secs)
            }
            Self::Parse { message, .. } => {
                format!("❌ Parse error: {}\n💡 This might be a temporary issue, try again", message)
            }
            Self::Validation { message } => {
                format!("❌ Validation error: {}\n💡 Check your input format", message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

impl From<reqwest::Error> for NicheForgeError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::timeout("HTTP request", 30)
        } else if err.is_connect() {
            Self::network("Connection failed", status_code, url)
        } else {
            Self::network(err.to_string(), status_code, url)
        }
    }
}

impl From<serde_json::Error> for NicheForgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

impl From<std::num::ParseIntError> for NicheForgeError {
    fn from(err: std::num::ParseIntError) -> Self {
        Self::config(format!("invalid integer: {}", err))
    }
}

impl From<std::num::ParseFloatError> for NicheForgeError {
    fn from(err: std::num::ParseFloatError) -> Self {
        Self::config(format!("invalid number: {}", err))
    }
}

impl From<tokio::time::error::Elapsed> for NicheForgeError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::timeout("Operation", 30)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, NicheForgeError>;

#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::NicheForgeError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::NicheForgeError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::NicheForgeError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::NicheForgeError::validation(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_propagates() {
        let err = NicheForgeError::registrar("porchcentral.com", "API request failed", Some(500));
        assert_eq!(err.status_code(), Some(500));
        assert!(err.is_transport());
        assert!(err.to_string().contains("porchcentral.com"));
    }

    #[test]
    fn test_macros_format() {
        let err = config_error!("bad value for {}: {}", "NICHE_FORGE_MAX_ATTEMPTS", "abc");
        assert!(err.to_string().contains("NICHE_FORGE_MAX_ATTEMPTS"));
        let err = validation_error!("label too short");
        assert!(!err.is_transport());
        assert!(err.user_message().contains("label too short"));
    }
}
