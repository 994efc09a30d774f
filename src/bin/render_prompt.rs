use anyhow::Context;
use catalog_relay::utils::logger::{self, LogFormat};
use catalog_relay::{CatalogStore, PromptComposer};
use clap::Parser;
use std::sync::Arc;

/// 離線預覽組好的 prompt，不呼叫模型
#[derive(Parser)]
#[command(name = "render_prompt")]
#[command(about = "Render the prompt a question would produce, without calling the model")]
struct Args {
    /// Path to a TOML catalog file (bundled catalogs when omitted)
    #[arg(short, long)]
    catalog_file: Option<String>,

    #[arg(long, default_value = "pds")]
    catalog: String,

    #[arg(short, long, default_value = "concise")]
    template: String,

    /// List catalog keys and template ids instead of rendering
    #[arg(long)]
    list: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// The user question to embed
    question: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.verbose, LogFormat::Compact);

    let store = match &args.catalog_file {
        Some(path) => CatalogStore::from_file(path)
            .with_context(|| format!("Failed to load catalog file '{}'", path))?,
        None => CatalogStore::builtin().context("Failed to load bundled catalogs")?,
    };

    if args.list {
        println!("📋 Catalogs:  {}", store.catalog_keys().join(", "));
        println!("📋 Templates: {}", store.template_ids().join(", "));
        return Ok(());
    }

    let question = args
        .question
        .context("A question is required unless --list is given")?;

    let composer = PromptComposer::new(Arc::new(store));
    let prompt = composer.compose(&args.template, &args.catalog, &question)?;
    print!("{}", prompt);

    Ok(())
}
