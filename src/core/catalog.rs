use crate::config::catalog_config::CatalogFile;
use crate::domain::model::{Catalog, Template};
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::is_currency_code;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// 啟動時建立一次、執行期唯讀的目錄與範本表
#[derive(Debug, Clone)]
pub struct CatalogStore {
    catalogs: HashMap<String, Catalog>,
    templates: HashMap<String, Template>,
}

impl CatalogStore {
    pub fn from_definitions(catalogs: Vec<Catalog>, templates: Vec<Template>) -> Result<Self> {
        let mut catalog_map = HashMap::with_capacity(catalogs.len());
        for catalog in catalogs {
            validate_catalog(&catalog)?;
            let key = catalog.key.clone();
            if catalog_map.insert(key.clone(), catalog).is_some() {
                return Err(RelayError::InvalidCatalogError {
                    key,
                    reason: "duplicate catalog key".to_string(),
                });
            }
        }

        let mut template_map = HashMap::with_capacity(templates.len());
        for template in templates {
            validate_template(&template)?;
            let id = template.id.clone();
            if template_map.insert(id.clone(), template).is_some() {
                return Err(RelayError::ConfigError {
                    message: format!("duplicate template id '{}'", id),
                });
            }
        }

        tracing::debug!(
            "📚 Catalog store ready: {} catalogs, {} templates",
            catalog_map.len(),
            template_map.len()
        );

        Ok(Self {
            catalogs: catalog_map,
            templates: template_map,
        })
    }

    pub fn from_catalog_file(file: CatalogFile) -> Result<Self> {
        Self::from_definitions(file.catalogs, file.templates)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_catalog_file(CatalogFile::from_file(path)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_catalog_file(CatalogFile::from_toml_str(content)?)
    }

    pub fn builtin() -> Result<Self> {
        Self::from_catalog_file(CatalogFile::bundled()?)
    }

    pub fn get_catalog(&self, key: &str) -> Result<&Catalog> {
        self.catalogs
            .get(key)
            .ok_or_else(|| RelayError::UnknownCatalogError {
                key: key.to_string(),
            })
    }

    pub fn get_template(&self, id: &str) -> Result<&Template> {
        self.templates
            .get(id)
            .ok_or_else(|| RelayError::UnknownTemplateError { id: id.to_string() })
    }

    pub fn catalog_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.catalogs.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn template_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

fn invalid(catalog: &Catalog, reason: String) -> RelayError {
    RelayError::InvalidCatalogError {
        key: catalog.key.clone(),
        reason,
    }
}

fn validate_catalog(catalog: &Catalog) -> Result<()> {
    if catalog.key.trim().is_empty() {
        return Err(invalid(catalog, "catalog key cannot be empty".to_string()));
    }
    if catalog.packages.is_empty() {
        return Err(invalid(catalog, "at least one package is required".to_string()));
    }

    // 以第一個套件的幣別為準，整份目錄必須一致
    let currency = catalog.packages[0].currency.as_str();
    if !is_currency_code(currency) {
        return Err(invalid(
            catalog,
            format!("currency '{}' is not a 3-letter uppercase code", currency),
        ));
    }

    let mut names = HashSet::new();
    for item in catalog.items() {
        if item.name.trim().is_empty() {
            return Err(invalid(catalog, "offering name cannot be empty".to_string()));
        }
        if !names.insert(item.name.as_str()) {
            return Err(invalid(catalog, format!("duplicate offering '{}'", item.name)));
        }
        if item.price < Decimal::ZERO {
            return Err(invalid(
                catalog,
                format!("offering '{}' has a negative price", item.name),
            ));
        }
        if item.currency != currency {
            return Err(invalid(
                catalog,
                format!(
                    "offering '{}' uses {} but the catalog uses {}",
                    item.name, item.currency, currency
                ),
            ));
        }
    }

    Ok(())
}

fn validate_template(template: &Template) -> Result<()> {
    if template.id.trim().is_empty() {
        return Err(RelayError::ConfigError {
            message: "template id cannot be empty".to_string(),
        });
    }
    if template.persona.trim().is_empty() {
        return Err(RelayError::ConfigError {
            message: format!("template '{}' has an empty persona", template.id),
        });
    }
    Ok(())
}
