pub mod catalog_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_range, validate_required_field,
    validate_url, Validate,
};
use clap::Parser;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone, Parser)]
#[command(name = "catalog-relay")]
#[command(about = "HTTP relay that answers catalog questions through a generative model")]
pub struct RelayConfig {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,

    /// TOML file with [[catalogs]] and [[templates]]; bundled catalogs when omitted
    #[arg(long, env = "CATALOG_FILE")]
    pub catalog_file: Option<String>,

    #[arg(long = "catalog", env = "DEFAULT_CATALOG", default_value = "pds")]
    pub default_catalog: String,

    #[arg(long = "template", env = "DEFAULT_TEMPLATE", default_value = "concise")]
    pub default_template: String,

    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "60")]
    pub request_timeout_secs: u64,

    /// Reject questions longer than this many characters
    #[arg(long, env = "MAX_QUESTION_CHARS")]
    pub max_question_chars: Option<usize>,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for RelayConfig {
    fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn api_key(&self) -> &str {
        self.gemini_api_key.as_deref().unwrap_or_default()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn gemini_base_url(&self) -> &str {
        &self.gemini_base_url
    }

    fn catalog_file(&self) -> Option<&str> {
        self.catalog_file.as_deref()
    }

    fn default_catalog(&self) -> &str {
        &self.default_catalog
    }

    fn default_template(&self) -> &str {
        &self.default_template
    }

    fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
    }

    fn max_question_chars(&self) -> Option<usize> {
        self.max_question_chars
    }
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<()> {
        // 缺少金鑰必須在啟動時失敗，不能等到回傳空答案
        let api_key = validate_required_field("GEMINI_API_KEY", &self.gemini_api_key)?;
        validate_non_empty_string("GEMINI_API_KEY", api_key)?;

        validate_non_empty_string("host", &self.host)?;
        validate_range("port", self.port, 1, u16::MAX)?;
        validate_non_empty_string("model", &self.model)?;
        validate_url("gemini_base_url", &self.gemini_base_url)?;
        validate_range("request_timeout_secs", self.request_timeout_secs, 1, 600)?;

        if let Some(path) = &self.catalog_file {
            validate_file_extension("catalog_file", path, &["toml"])?;
        }
        if let Some(limit) = self.max_question_chars {
            validate_range("max_question_chars", limit, 1, usize::MAX)?;
        }

        validate_non_empty_string("catalog", &self.default_catalog)?;
        validate_non_empty_string("template", &self.default_template)?;

        tracing::debug!("✅ Relay configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::RelayError;

    fn parse(args: &[&str]) -> RelayConfig {
        let mut argv = vec!["catalog-relay"];
        argv.extend_from_slice(args);
        RelayConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse(&[
            "--gemini-api-key",
            "test-key",
            "--port",
            "8088",
            "--catalog",
            "acme",
            "--template",
            "structured",
        ]);

        assert_eq!(config.api_key(), "test-key");
        assert_eq!(config.port, 8088);
        assert!(config.listen_addr().ends_with(":8088"));
        assert_eq!(config.default_catalog(), "acme");
        assert_eq!(config.default_template(), "structured");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let mut config = parse(&["--gemini-api-key", "k"]);
        config.gemini_api_key = None;
        assert!(matches!(
            config.validate(),
            Err(RelayError::MissingConfigError { .. })
        ));

        config.gemini_api_key = Some("   ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let mut config = parse(&["--gemini-api-key", "k"]);
        config.gemini_base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = parse(&["--gemini-api-key", "k"]);
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = parse(&["--gemini-api-key", "k"]);
        config.catalog_file = Some("catalogs.yaml".to_string());
        assert!(config.validate().is_err());

        let mut config = parse(&["--gemini-api-key", "k"]);
        config.max_question_chars = Some(0);
        assert!(config.validate().is_err());
    }
}
