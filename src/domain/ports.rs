use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// 外部文字生成能力。每個有效請求呼叫一次，不重試。
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<T: InferenceGateway + ?Sized> InferenceGateway for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt).await
    }
}

/// 使用者問題進入 prompt 前的信任邊界。
///
/// 實作可以拒絕問題，或回傳改寫後的文字；預設不掛任何 guard，
/// 問題會原樣嵌入 prompt。
pub trait QuestionGuard: Send + Sync {
    fn screen(&self, question: &str) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn listen_addr(&self) -> String;
    fn api_key(&self) -> &str;
    fn model(&self) -> &str;
    fn gemini_base_url(&self) -> &str;
    fn catalog_file(&self) -> Option<&str>;
    fn default_catalog(&self) -> &str;
    fn default_template(&self) -> &str;
    fn request_timeout_secs(&self) -> u64;
    fn max_question_chars(&self) -> Option<usize>;
}
