pub mod catalog;
pub mod composer;
pub mod guard;
pub mod handler;

pub use crate::domain::model::{Catalog, Envelope, Offering, Template};
pub use crate::domain::ports::{ConfigProvider, InferenceGateway, QuestionGuard};
pub use crate::utils::error::Result;
