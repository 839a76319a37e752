//! 单个学生评分流程 - 流程层
//!
//! 流程顺序：
//! 1. 答案过短 → 跳过
//! 2. 构建提示词 → 调用模型（带超时）
//! 3. 宽松解析 JSON → 分数 / 评语 / 错误类型
//! 4. 任何失败 → "AI Error" 占位结果

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clients::AiGateway;
use crate::error::LlmError;
use crate::models::{EvaluationResult, StudentAnswer};
use crate::services::{prompt_builder, score_parser, MistakeClassifier};
use crate::utils::{json_extract, truncate_text};
use crate::workflow::student_ctx::{GradingBrief, StudentCtx};

/// AI 调用失败时的评语
pub const AI_ERROR_FEEDBACK: &str = "AI Error";
/// 模型没有给评语时的默认值
pub const DEFAULT_FEEDBACK: &str = "Checked";
/// AI 调用失败时的分数
pub const FALLBACK_SCORE: &str = "0/10";

/// 单个学生的评分结果
#[derive(Debug, Clone, PartialEq)]
pub enum StudentOutcome {
    /// 模型给出了可用的评分
    Evaluated {
        result: EvaluationResult,
        /// 参与平均分计算的数值
        numeric_score: f64,
        mistakes: Vec<&'static str>,
    },
    /// 模型调用失败或返回内容不可用
    AiError { result: EvaluationResult },
    /// 答案过短，不参与评分
    Skipped,
}

impl StudentOutcome {
    pub fn ai_error(student_id: &str) -> Self {
        StudentOutcome::AiError {
            result: EvaluationResult {
                student_id: student_id.to_string(),
                score: FALLBACK_SCORE.to_string(),
                feedback: AI_ERROR_FEEDBACK.to_string(),
            },
        }
    }
}

/// 学生评分流程
///
/// - 只处理单个学生
/// - 不持有可变状态，可以在多个任务间共享
pub struct StudentFlow {
    gateway: Arc<dyn AiGateway>,
    classifier: Arc<dyn MistakeClassifier>,
    brief: GradingBrief,
    timeout: Duration,
}

impl StudentFlow {
    pub fn new(
        gateway: Arc<dyn AiGateway>,
        classifier: Arc<dyn MistakeClassifier>,
        brief: GradingBrief,
        timeout: Duration,
    ) -> Self {
        Self {
            gateway,
            classifier,
            brief,
            timeout,
        }
    }

    pub async fn run(&self, ctx: &StudentCtx, student: &StudentAnswer) -> StudentOutcome {
        let Some(answer_text) = student.gradable_text() else {
            debug!("{} 答案过短，跳过", ctx);
            return StudentOutcome::Skipped;
        };

        let prompt = prompt_builder::build_evaluation_prompt(
            &self.brief.question,
            &self.brief.model_answer,
            answer_text,
            self.brief.strictness,
        );

        let raw = match self.call_model(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("{} ⚠️ AI 评分失败: {}", ctx, e);
                return StudentOutcome::ai_error(&ctx.student_id);
            }
        };

        let data = json_extract::extract(&raw);
        if data.is_empty() {
            warn!(
                "{} ⚠️ 无法从模型返回中解析 JSON: {}",
                ctx,
                truncate_text(&raw, 120)
            );
            return StudentOutcome::ai_error(&ctx.student_id);
        }

        let raw_feedback = data.get("feedback").and_then(Value::as_str).unwrap_or("");
        let mistakes = self.classifier.classify(raw_feedback);

        let result = EvaluationResult {
            student_id: ctx.student_id.clone(),
            score: score_parser::display_score(data.get("score")),
            feedback: json_extract::non_empty_str(&data, "feedback")
                .unwrap_or(DEFAULT_FEEDBACK)
                .to_string(),
        };
        info!("{} ✓ 得分: {}", ctx, result.score);

        StudentOutcome::Evaluated {
            numeric_score: score_parser::numeric_score(data.get("score")),
            mistakes,
            result,
        }
    }

    async fn call_model(&self, prompt: &str) -> Result<String, LlmError> {
        tokio::time::timeout(self.timeout, self.gateway.generate_text(prompt))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout.as_secs()))?
    }
}
