//! 答题卡识别服务 - 业务能力层
//!
//! 只负责"图片 → 题目 + 学生答案"能力

use std::sync::Arc;

use tracing::info;

use crate::clients::AiGateway;
use crate::error::{AppError, Result};
use crate::models::{ProcessDocsRequest, ProcessDocsResponse};
use crate::services::prompt_builder;
use crate::utils::json_extract;

pub struct OcrService {
    gateway: Arc<dyn AiGateway>,
}

impl OcrService {
    pub fn new(gateway: Arc<dyn AiGateway>) -> Self {
        Self { gateway }
    }

    /// 识别题目和答题卡
    ///
    /// 没有答题卡时直接返回错误，不调用模型
    pub async fn process(&self, request: &ProcessDocsRequest) -> Result<ProcessDocsResponse> {
        info!(
            "📡 正在识别: {} 张题目图片, {} 张答题卡",
            request.qp_list.len(),
            request.ans_list.len()
        );

        if request.ans_list.is_empty() {
            return Err(AppError::business("No answer sheets received."));
        }

        let parts = prompt_builder::build_ocr_parts(&request.qp_list, &request.ans_list);
        let raw = self.gateway.generate(&parts).await?;
        let response = ProcessDocsResponse::from_extracted(json_extract::extract(&raw));

        info!("✅ 识别成功: 检测到 {} 名学生", response.students.len());
        Ok(response)
    }
}
