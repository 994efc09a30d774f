use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 可販售的方案或服務
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offering {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub currency: String,
    /// 例如 "month"，渲染為 `/month`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<String>,
}

impl Offering {
    pub fn new(name: &str, description: &str, price: Decimal, currency: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            price,
            currency: currency.to_string(),
            recurrence: None,
        }
    }

    pub fn with_recurrence(mut self, recurrence: &str) -> Self {
        self.recurrence = Some(recurrence.to_string());
        self
    }
}

/// 加購項目，與 Offering 同形，只差在渲染到哪一段
pub type Customization = Offering;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub key: String,
    pub company: String,
    /// 公司業務的一句話描述，供 persona 使用
    #[serde(default)]
    pub business: String,
    #[serde(default)]
    pub currency_symbol: String,
    #[serde(default = "default_package_heading")]
    pub package_heading: String,
    #[serde(default = "default_customization_heading")]
    pub customization_heading: String,
    pub packages: Vec<Offering>,
    #[serde(default)]
    pub customizations: Vec<Customization>,
}

fn default_package_heading() -> String {
    "Available Packages:".to_string()
}

fn default_customization_heading() -> String {
    "Customization Add-ons:".to_string()
}

impl Catalog {
    /// 目錄內所有項目，套件在前、加購在後
    pub fn items(&self) -> impl Iterator<Item = &Offering> {
        self.packages.iter().chain(self.customizations.iter())
    }

    pub fn currency(&self) -> Option<&str> {
        self.packages.first().map(|o| o.currency.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogRendering {
    /// 編號條列的自然語言
    #[default]
    Prose,
    /// JSON 區塊
    Structured,
}

/// 一種把目錄與問題組成 prompt 的風格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    /// 可引用 `{company}` 與 `{business}`
    pub persona: String,
    #[serde(default)]
    pub guidelines: Vec<String>,
    #[serde(default)]
    pub rendering: CatalogRendering,
    #[serde(default = "default_closing")]
    pub closing: String,
}

fn default_closing() -> String {
    "Now, based on the question below, respond naturally and only suggest what's relevant:"
        .to_string()
}

/// 回傳給呼叫端的統一 JSON 信封
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn answered(question: String, answer: String) -> Self {
        Self {
            success: true,
            question: Some(question),
            answer: Some(answer),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            question: None,
            answer: None,
            error: Some(error.into()),
        }
    }
}
