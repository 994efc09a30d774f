pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::gemini::GeminiGateway;
pub use config::RelayConfig;
pub use crate::core::{
    catalog::CatalogStore,
    composer::PromptComposer,
    handler::{AskHandler, AskOutcome},
};
pub use utils::error::{RelayError, Result};
