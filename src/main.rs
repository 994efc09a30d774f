use catalog_relay::utils::{logger, validation::Validate};
use catalog_relay::RelayConfig;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 必須在解析參數之前載入
    dotenv::dotenv().ok();
    let config = RelayConfig::parse();

    // 初始化日誌
    logger::init(config.verbose, config.log_format);

    tracing::info!("Starting catalog-relay");

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if let Err(e) = catalog_relay::app::run(&config).await {
        tracing::error!("❌ Server stopped with error: {} (Category: {:?})", e, e.category());
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    tracing::info!("👋 Server shut down");
    Ok(())
}
