//! 标准答案生成服务 - 业务能力层

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::clients::AiGateway;
use crate::error::{AppError, Result};
use crate::models::GenerateAnswerResponse;
use crate::services::prompt_builder;
use crate::utils::{json_extract, truncate_text};

pub struct AnswerService {
    gateway: Arc<dyn AiGateway>,
}

impl AnswerService {
    pub fn new(gateway: Arc<dyn AiGateway>) -> Self {
        Self { gateway }
    }

    /// 为题目生成简洁的标准答案
    ///
    /// 模型返回中没有字符串类型的 `answer` 字段时视为失败，空字符串照常返回
    pub async fn generate(&self, question: &str) -> Result<GenerateAnswerResponse> {
        info!("✍️ 正在生成标准答案: {}", truncate_text(question, 80));

        let prompt = prompt_builder::build_model_answer_prompt(question);
        let raw = self.gateway.generate_text(&prompt).await?;
        debug!("模型原始返回: {}", truncate_text(&raw, 200));

        let map = json_extract::extract(&raw);
        let answer = map
            .get("answer")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::business("model response has no answer field"))?;

        Ok(GenerateAnswerResponse {
            answer: answer.to_string(),
        })
    }
}
