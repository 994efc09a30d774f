// Adapters 層：對外部系統的具體實作（模型 API、HTTP 伺服器）

pub mod gemini;
pub mod http;
