use crate::core::catalog::CatalogStore;
use crate::domain::model::{Catalog, CatalogRendering, Offering, Template};
use crate::utils::error::{RelayError, Result, QUESTION_REQUIRED_MESSAGE};
use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;

/// 依範本把目錄與使用者問題組成單一 prompt。
///
/// 問題原樣嵌入、不做跳脫；輸入信任邊界交給 [`QuestionGuard`](crate::domain::ports::QuestionGuard)。
#[derive(Debug, Clone)]
pub struct PromptComposer {
    store: Arc<CatalogStore>,
}

impl PromptComposer {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn compose(&self, template_id: &str, catalog_key: &str, question: &str) -> Result<String> {
        let template = self.store.get_template(template_id)?;
        let catalog = self.store.get_catalog(catalog_key)?;
        render(template, catalog, question)
    }
}

/// 純函式：同樣的輸入永遠得到相同位元組的輸出
pub fn render(template: &Template, catalog: &Catalog, question: &str) -> Result<String> {
    if question.is_empty() {
        return Err(RelayError::validation(QUESTION_REQUIRED_MESSAGE));
    }

    let mut prompt = String::new();

    prompt.push_str(&persona(template, catalog));
    prompt.push_str("\n\n");

    if !template.guidelines.is_empty() {
        prompt.push_str("Your job is to:\n");
        for guideline in &template.guidelines {
            prompt.push_str("- ");
            prompt.push_str(guideline);
            prompt.push('\n');
        }
        prompt.push('\n');
    }

    match template.rendering {
        CatalogRendering::Prose => render_prose(&mut prompt, catalog),
        CatalogRendering::Structured => render_structured(&mut prompt, catalog)?,
    }

    prompt.push_str(&template.closing);
    prompt.push_str("\n\nUser: \"");
    prompt.push_str(question);
    prompt.push_str("\"\nAI:\n");

    Ok(prompt)
}

fn persona(template: &Template, catalog: &Catalog) -> String {
    template
        .persona
        .replace("{company}", &catalog.company)
        .replace("{business}", &catalog.business)
}

/// 價格原樣輸出，不加千分位，例如 `AUD $1299/month`
fn price_label(catalog: &Catalog, offering: &Offering) -> String {
    let mut label = format!(
        "{} {}{}",
        offering.currency, catalog.currency_symbol, offering.price
    );
    if let Some(recurrence) = &offering.recurrence {
        label.push('/');
        label.push_str(recurrence);
    }
    label
}

fn render_prose(prompt: &mut String, catalog: &Catalog) {
    prompt.push_str(&catalog.package_heading);
    prompt.push('\n');
    for (index, package) in catalog.packages.iter().enumerate() {
        // String 的 fmt::Write 不會失敗
        let _ = writeln!(
            prompt,
            "{}. {} – {}",
            index + 1,
            package.name,
            price_label(catalog, package)
        );
        if !package.description.is_empty() {
            let _ = writeln!(prompt, "   → {}", package.description);
        }
        prompt.push('\n');
    }

    if !catalog.customizations.is_empty() {
        prompt.push_str(&catalog.customization_heading);
        prompt.push('\n');
        for item in &catalog.customizations {
            let _ = writeln!(prompt, "- {} – {}", item.name, price_label(catalog, item));
            if !item.description.is_empty() {
                let _ = writeln!(prompt, "  → {}", item.description);
            }
        }
        prompt.push('\n');
    }
}

#[derive(Serialize)]
struct StructuredCatalog<'a> {
    company: &'a str,
    currency: Option<&'a str>,
    packages: &'a [Offering],
    customizations: &'a [Offering],
}

fn render_structured(prompt: &mut String, catalog: &Catalog) -> Result<()> {
    let view = StructuredCatalog {
        company: &catalog.company,
        currency: catalog.currency(),
        packages: &catalog.packages,
        customizations: &catalog.customizations,
    };

    prompt.push_str("Catalog (JSON):\n");
    prompt.push_str(&serde_json::to_string_pretty(&view)?);
    prompt.push_str("\n\n");
    Ok(())
}
