use crate::core::composer::PromptComposer;
use crate::domain::model::Envelope;
use crate::domain::ports::{InferenceGateway, QuestionGuard};
use crate::utils::error::{ErrorCategory, RelayError, Result, QUESTION_REQUIRED_MESSAGE};
use serde_json::Value;

/// 單一請求的生命週期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskState {
    Received,
    Validated,
    Composing,
    Inferring,
    Responded,
    /// 驗證失敗
    Rejected,
    Failed,
}

/// 處理結果：HTTP 狀態碼加上回應信封
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskOutcome {
    pub status: u16,
    pub envelope: Envelope,
}

impl AskOutcome {
    fn from_error(error: &RelayError) -> Self {
        Self {
            status: error.status_code(),
            envelope: Envelope::failed(error.public_message()),
        }
    }
}

pub struct AskHandler<G: InferenceGateway> {
    composer: PromptComposer,
    gateway: G,
    guard: Option<Box<dyn QuestionGuard>>,
    default_catalog: String,
    default_template: String,
}

impl<G: InferenceGateway> AskHandler<G> {
    pub fn new(
        composer: PromptComposer,
        gateway: G,
        default_catalog: impl Into<String>,
        default_template: impl Into<String>,
    ) -> Self {
        Self {
            composer,
            gateway,
            guard: None,
            default_catalog: default_catalog.into(),
            default_template: default_template.into(),
        }
    }

    pub fn with_guard(mut self, guard: Box<dyn QuestionGuard>) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn default_catalog(&self) -> &str {
        &self.default_catalog
    }

    pub fn default_template(&self) -> &str {
        &self.default_template
    }

    /// 啟動時確認預設的 (catalog, template) 存在
    pub fn check_defaults(&self) -> Result<()> {
        let store = self.composer.store();
        store.get_catalog(&self.default_catalog)?;
        store.get_template(&self.default_template)?;
        Ok(())
    }

    /// 以預設的目錄與範本處理原始請求內容
    pub async fn handle(&self, body: &[u8]) -> AskOutcome {
        self.handle_with(body, &self.default_catalog, &self.default_template)
            .await
    }

    pub async fn handle_with(&self, body: &[u8], catalog_key: &str, template_id: &str) -> AskOutcome {
        // 非 JSON 內容視同沒有提供問題
        let value = serde_json::from_slice::<Value>(body).unwrap_or(Value::Null);
        self.handle_value(&value, catalog_key, template_id).await
    }

    pub async fn handle_value(&self, body: &Value, catalog_key: &str, template_id: &str) -> AskOutcome {
        let mut state = AskState::Received;
        self.respond(&mut state, body, catalog_key, template_id).await
    }

    /// 每條路徑都以 `Responded` 結束
    async fn respond(
        &self,
        state: &mut AskState,
        body: &Value,
        catalog_key: &str,
        template_id: &str,
    ) -> AskOutcome {
        let question = match extract_question(body) {
            Ok(question) => question,
            Err(e) => {
                advance(state, AskState::Rejected);
                tracing::warn!("⚠️ Rejected ask request: {}", e);
                advance(state, AskState::Responded);
                return AskOutcome::from_error(&e);
            }
        };
        advance(state, AskState::Validated);

        match self.answer(state, &question, catalog_key, template_id).await {
            Ok(answer) => {
                advance(state, AskState::Responded);
                tracing::info!(
                    catalog = catalog_key,
                    template = template_id,
                    "✅ Answered question ({} chars)",
                    answer.len()
                );
                AskOutcome {
                    status: 200,
                    envelope: Envelope::answered(question, answer),
                }
            }
            Err(e) => {
                if e.category() == ErrorCategory::Client {
                    advance(state, AskState::Rejected);
                    tracing::warn!("⚠️ Rejected ask request: {}", e);
                } else {
                    advance(state, AskState::Failed);
                    tracing::error!(
                        catalog = catalog_key,
                        template = template_id,
                        "❌ Error processing request: {} (Category: {:?})",
                        e,
                        e.category()
                    );
                    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                }
                advance(state, AskState::Responded);
                AskOutcome::from_error(&e)
            }
        }
    }

    async fn answer(
        &self,
        state: &mut AskState,
        question: &str,
        catalog_key: &str,
        template_id: &str,
    ) -> Result<String> {
        let screened = match &self.guard {
            Some(guard) => guard.screen(question)?,
            None => question.to_string(),
        };

        advance(state, AskState::Composing);
        let prompt = self.composer.compose(template_id, catalog_key, &screened)?;
        tracing::trace!("Composed prompt:\n{}", prompt);

        advance(state, AskState::Inferring);
        self.gateway.generate(&prompt).await
    }
}

fn advance(state: &mut AskState, next: AskState) {
    tracing::debug!("Ask request {:?} → {:?}", state, next);
    *state = next;
}

/// `question` 必須存在、是字串且非空
pub fn extract_question(body: &Value) -> Result<String> {
    match body.get("question") {
        Some(Value::String(question)) if !question.is_empty() => Ok(question.clone()),
        _ => Err(RelayError::validation(QUESTION_REQUIRED_MESSAGE)),
    }
}
