use thiserror::Error;

/// 對呼叫端顯示的固定訊息
pub const QUESTION_REQUIRED_MESSAGE: &str = "Question must be provided as a string";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to process request";
pub const UNHANDLED_MESSAGE: &str = "Something went wrong!";

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("{message}")]
    ValidationError { message: String },

    #[error("Question rejected: {reason}")]
    QuestionRejected { reason: String },

    #[error("Unknown catalog: {key}")]
    UnknownCatalogError { key: String },

    #[error("Unknown template: {id}")]
    UnknownTemplateError { id: String },

    #[error("{message}")]
    GatewayError { message: String },

    #[error("Inference request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid catalog '{key}': {reason}")]
    InvalidCatalogError { key: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 呼叫端輸入錯誤
    Client,
    /// 目錄或範本設定錯誤
    Configuration,
    /// 模型呼叫失敗
    Gateway,
    Internal,
}

impl RelayError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn gateway(message: impl Into<String>) -> Self {
        Self::GatewayError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } | Self::QuestionRejected { .. } => ErrorCategory::Client,
            Self::UnknownCatalogError { .. }
            | Self::UnknownTemplateError { .. }
            | Self::InvalidCatalogError { .. }
            | Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::TomlError(_) => ErrorCategory::Configuration,
            Self::GatewayError { .. } | Self::HttpError(_) => ErrorCategory::Gateway,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    /// 回應的 HTTP 狀態碼；設定錯誤與模型錯誤一律 500
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Client => 400,
            _ => 500,
        }
    }

    /// 放進回應信封的訊息，內部錯誤不外洩細節
    pub fn public_message(&self) -> String {
        match self.category() {
            ErrorCategory::Internal => UNHANDLED_MESSAGE.to_string(),
            _ => {
                let message = self.to_string();
                if message.trim().is_empty() {
                    GENERIC_FAILURE_MESSAGE.to_string()
                } else {
                    message
                }
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MissingConfigError { .. } => "Set the missing value via flag, environment or .env file",
            Self::UnknownCatalogError { .. } | Self::UnknownTemplateError { .. } => {
                "Check the catalog file and the --catalog / --template selection"
            }
            Self::InvalidCatalogError { .. } | Self::TomlError(_) => "Fix the catalog file and restart",
            Self::InvalidConfigValueError { .. } | Self::ConfigError { .. } => {
                "Review the startup flags and environment variables"
            }
            Self::GatewayError { .. } | Self::HttpError(_) => {
                "Check the Gemini API key, quota and network connectivity"
            }
            _ => "Retry the request; inspect the server logs if it keeps failing",
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        assert_eq!(RelayError::validation(QUESTION_REQUIRED_MESSAGE).status_code(), 400);
        let rejected = RelayError::QuestionRejected {
            reason: "too long".to_string(),
        };
        assert_eq!(rejected.status_code(), 400);
    }

    #[test]
    fn test_configuration_and_gateway_errors_are_flat_500() {
        let unknown = RelayError::UnknownCatalogError {
            key: "acme".to_string(),
        };
        assert_eq!(unknown.category(), ErrorCategory::Configuration);
        assert_eq!(unknown.status_code(), 500);
        assert_eq!(unknown.public_message(), "Unknown catalog: acme");

        let gateway = RelayError::gateway("quota exceeded");
        assert_eq!(gateway.status_code(), 500);
        assert_eq!(gateway.public_message(), "quota exceeded");
    }

    #[test]
    fn test_empty_gateway_message_falls_back_to_generic() {
        assert_eq!(RelayError::gateway("").public_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_internal_errors_do_not_leak_details() {
        let err = RelayError::IoError(std::io::Error::new(
            std::io::ErrorKind::Other,
            "/etc/secret missing",
        ));
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert_eq!(err.public_message(), UNHANDLED_MESSAGE);
    }
}
