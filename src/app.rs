use crate::adapters::{gemini::GeminiGateway, http};
use crate::core::catalog::CatalogStore;
use crate::core::composer::PromptComposer;
use crate::core::guard::LengthLimitGuard;
use crate::core::handler::AskHandler;
use crate::domain::ports::{ConfigProvider, InferenceGateway};
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::net::TcpListener;

/// 依設定載入目錄：指定檔案優先，否則使用內建目錄
pub fn load_store<C: ConfigProvider>(config: &C) -> Result<CatalogStore> {
    match config.catalog_file() {
        Some(path) => {
            tracing::info!("📁 Loading catalogs from: {}", path);
            CatalogStore::from_file(path)
        }
        None => {
            tracing::info!("📁 Using bundled catalogs");
            CatalogStore::builtin()
        }
    }
}

/// 組裝請求處理器，並確認預設的目錄與範本存在
pub fn build_handler<C, G>(config: &C, store: CatalogStore, gateway: G) -> Result<AskHandler<G>>
where
    C: ConfigProvider,
    G: InferenceGateway,
{
    let composer = PromptComposer::new(Arc::new(store));
    let mut handler = AskHandler::new(
        composer,
        gateway,
        config.default_catalog(),
        config.default_template(),
    );

    if let Some(limit) = config.max_question_chars() {
        tracing::info!("🛡️ Question length limit: {} chars", limit);
        handler = handler.with_guard(Box::new(LengthLimitGuard::new(limit)));
    }

    handler.check_defaults()?;
    Ok(handler)
}

pub async fn run<C: ConfigProvider>(config: &C) -> Result<()> {
    let store = load_store(config)?;
    tracing::info!(
        "📚 Catalogs: [{}], templates: [{}]",
        store.catalog_keys().join(", "),
        store.template_ids().join(", ")
    );

    let gateway = GeminiGateway::from_config(config)?;
    tracing::info!("🤖 Inference model: {}", gateway.model());

    let handler = build_handler(config, store, gateway)?;
    tracing::info!(
        "🧩 Default selection: catalog '{}', template '{}'",
        handler.default_catalog(),
        handler.default_template()
    );

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Server running on {}", addr);
    tracing::info!("💬 Ask: POST /api/ask (JSON)");
    tracing::info!("💬 Ask with selection: POST /api/catalogs/{{catalog}}/templates/{{template}}/ask");
    tracing::info!("📊 Health check: GET /api/health");

    http::serve(listener, Arc::new(handler)).await
}
