//! API 模块
//!
//! 对外暴露的 HTTP 接口

pub mod handlers;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// 创建路由
pub fn create_router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/process-docs", post(handlers::process_docs))
        .route("/api/generate-answer", post(handlers::generate_answer))
        .route("/api/evaluate-text", post(handlers::evaluate_text))
        .route("/api/class-report", post(handlers::class_report))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
