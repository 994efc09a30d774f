use crate::core::handler::{AskHandler, AskOutcome};
use crate::domain::model::Envelope;
use crate::domain::ports::InferenceGateway;
use crate::utils::error::{Result, UNHANDLED_MESSAGE};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// 建立完整路由，服務依賴以 state 注入
pub fn router<G: InferenceGateway + 'static>(handler: Arc<AskHandler<G>>) -> Router {
    Router::new()
        .route("/api/ask", post(ask::<G>))
        .route(
            "/api/catalogs/{catalog}/templates/{template}/ask",
            post(ask_with_selection::<G>),
        )
        .route("/api/health", get(health_check))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(handler)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// 任何來源皆可；`*` 不能搭配 credentials，所以回傳請求的 Origin
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

pub async fn serve<G: InferenceGateway + 'static>(
    listener: TcpListener,
    handler: Arc<AskHandler<G>>,
) -> Result<()> {
    axum::serve(listener, router(handler))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn ask<G: InferenceGateway + 'static>(
    State(handler): State<Arc<AskHandler<G>>>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    match body {
        Ok(body) => outcome_response(handler.handle(&body).await),
        Err(rejection) => rejection_response(rejection),
    }
}

async fn ask_with_selection<G: InferenceGateway + 'static>(
    State(handler): State<Arc<AskHandler<G>>>,
    Path((catalog, template)): Path<(String, String)>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    match body {
        Ok(body) => outcome_response(handler.handle_with(&body, &catalog, &template).await),
        Err(rejection) => rejection_response(rejection),
    }
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(Envelope::failed("Not found"))).into_response()
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(Envelope::failed("Method not allowed")),
    )
        .into_response()
}

/// 讀取請求內容失敗（例如超過 2 MB 上限）時一律回傳通用錯誤
fn rejection_response(rejection: BytesRejection) -> Response {
    tracing::error!(
        "❌ Failed to read request body ({}): {}",
        rejection.status(),
        rejection.body_text()
    );
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Envelope::failed(UNHANDLED_MESSAGE)),
    )
        .into_response()
}

fn outcome_response(outcome: AskOutcome) -> Response {
    let status = StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(outcome.envelope)).into_response()
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("❌ Request handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Envelope::failed(UNHANDLED_MESSAGE)),
    )
        .into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("🛑 Shutdown signal received");
}
