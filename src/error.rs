use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 请求参数错误（4xx）
    #[error("{0}")]
    Validation(String),
    /// 业务逻辑错误，消息可以直接返回给调用方
    #[error("{0}")]
    Business(String),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn business(msg: impl Into<String>) -> Self {
        AppError::Business(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Business(_) | AppError::Llm(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 返回给客户端的错误消息
    ///
    /// 上游 LLM 的原始错误文本只写日志，不回传
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Business(msg) => msg.clone(),
            AppError::Llm(_) => "AI service request failed".to_string(),
            AppError::Config(_) => "Server misconfigured".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("❌ 请求失败: {}", self);
        } else {
            tracing::warn!("⚠️ 请求被拒绝: {}", self);
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {message}")]
    ApiCallFailed {
        model: String,
        message: String,
        /// 网络类错误，可以重试
        transient: bool,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 构建请求失败
    #[error("构建LLM请求失败: {0}")]
    RequestBuild(String),
    /// 调用超时
    #[error("LLM调用超时 ({0} 秒)")]
    Timeout(u64),
}

impl LlmError {
    pub fn is_transient(&self) -> bool {
        matches!(self, LlmError::ApiCallFailed { transient: true, .. })
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;
