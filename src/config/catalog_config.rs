use crate::domain::model::{Catalog, Template};
use crate::utils::error::{RelayError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 隨程式打包的預設目錄與範本
pub const BUNDLED_CATALOGS: &str = include_str!("../../config/catalogs.toml");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub catalogs: Vec<Catalog>,
    #[serde(default)]
    pub templates: Vec<Template>,
}

impl CatalogFile {
    /// 從 TOML 檔案載入目錄
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析目錄
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    pub fn bundled() -> Result<Self> {
        Self::from_toml_str(BUNDLED_CATALOGS)
    }

    /// 替換環境變數 (例如 ${COMPANY_NAME})，未設定的變數保留原文
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RelayError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}
