//! HTTP 处理函数
//!
//! 每个处理函数只做请求解析和响应封装，具体逻辑在 services / orchestrator 中

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::error;

use super::state::AppState;
use crate::error::{AppError, Result};
use crate::models::{
    ClassReport, ClassReportRequest, EvaluationRequest, EvaluationResponse, GenerateAnswerRequest,
    GenerateAnswerResponse, ProcessDocsRequest, ProcessDocsResponse,
};
use crate::services::report_service;

const GENERATE_ANSWER_FAILED: &str = "Failed to generate model answer";

/// 读取 JSON 请求体，格式错误时返回 400
fn json_body(payload: std::result::Result<Json<Value>, JsonRejection>) -> Result<Value> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}

fn typed_body<T: DeserializeOwned>(
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<T> {
    serde_json::from_value(json_body(payload)?)
        .map_err(|e| AppError::validation(format!("Invalid request body: {}", e)))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "model": state.model_name,
        "uptimeSeconds": state.started_at.elapsed().as_secs(),
    }))
}

/// POST /api/process-docs
pub async fn process_docs(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<ProcessDocsResponse>> {
    let request: ProcessDocsRequest = typed_body(payload)?;
    let response = state.ocr.process(&request).await?;
    Ok(Json(response))
}

/// POST /api/generate-answer
///
/// 任何失败都返回同一条错误消息
pub async fn generate_answer(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<GenerateAnswerResponse>> {
    let outcome = match typed_body::<GenerateAnswerRequest>(payload) {
        Ok(request) => state.answers.generate(&request.question).await,
        Err(e) => Err(e),
    };

    outcome.map(Json).map_err(|e| {
        error!("❌ 生成标准答案失败: {}", e);
        AppError::business(GENERATE_ANSWER_FAILED)
    })
}

/// POST /api/evaluate-text
pub async fn evaluate_text(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<EvaluationResponse>> {
    let request = EvaluationRequest::from_body(json_body(payload)?)?;
    Ok(Json(state.evaluator.evaluate(request).await))
}

/// POST /api/class-report
pub async fn class_report(
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<ClassReport>> {
    let request: ClassReportRequest = typed_body(payload)?;
    Ok(Json(report_service::build_report(&request.results)))
}
