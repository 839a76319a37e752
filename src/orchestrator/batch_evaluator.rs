//! 批量评分器 - 编排层
//!
//! ## 核心功能
//!
//! 1. **并发控制**：使用 Semaphore 限制同时进行的模型调用数量
//! 2. **顺序保证**：结果按请求中的学生顺序输出，与完成先后无关
//! 3. **取消**：任务放在 JoinSet 中，请求被丢弃时所有未完成的调用随之中止
//! 4. **汇总**：平均分、常见错误类型、改进建议
//!
//! 单个学生的评分细节委托给 `workflow::StudentFlow`

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::clients::AiGateway;
use crate::config::Config;
use crate::models::{EvaluationRequest, EvaluationResponse, TeacherInsights};
use crate::services::mistake_classifier::MistakeTally;
use crate::services::{score_parser, KeywordClassifier, MistakeClassifier};
use crate::utils::logging;
use crate::workflow::{GradingBrief, StudentCtx, StudentFlow, StudentOutcome};

/// 最多列出的常见错误类型数
const MAX_COMMON_MISTAKES: usize = 3;

/// 批量评分器
pub struct BatchEvaluator {
    gateway: Arc<dyn AiGateway>,
    classifier: Arc<dyn MistakeClassifier>,
    max_concurrent: usize,
    student_timeout: Duration,
}

impl BatchEvaluator {
    pub fn new(gateway: Arc<dyn AiGateway>, config: &Config) -> Self {
        Self {
            gateway,
            classifier: Arc::new(KeywordClassifier),
            max_concurrent: config.max_concurrent_evaluations.max(1),
            student_timeout: Duration::from_secs(config.student_timeout_secs),
        }
    }

    /// 替换错误类型识别器
    pub fn with_classifier(mut self, classifier: Arc<dyn MistakeClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// 对一批学生评分
    ///
    /// 单个学生失败不会中断整批
    pub async fn evaluate(&self, request: EvaluationRequest) -> EvaluationResponse {
        info!(
            "📝 正在评分 {} 名学生 (模式: {}, 并发: {})...",
            request.students.len(),
            request.strictness.label(),
            self.max_concurrent
        );

        let flow = Arc::new(StudentFlow::new(
            self.gateway.clone(),
            self.classifier.clone(),
            GradingBrief {
                question: request.question,
                model_answer: request.model_answer,
                strictness: request.strictness,
            },
            self.student_timeout,
        ));
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));

        let student_ids: Vec<String> = request
            .students
            .iter()
            .map(|s| s.student_id.clone())
            .collect();
        let mut slots: Vec<Option<StudentOutcome>> = vec![None; request.students.len()];
        let mut join_set = JoinSet::new();

        for (index, student) in request.students.into_iter().enumerate() {
            if student.gradable_text().is_none() {
                slots[index] = Some(StudentOutcome::Skipped);
                continue;
            }

            let flow = flow.clone();
            let semaphore = semaphore.clone();
            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let ctx = StudentCtx::new(index, student.student_id.clone());
                (index, flow.run(&ctx, &student).await)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => error!("评分任务执行失败: {}", e),
            }
        }

        // 任务异常退出的学生按 AI Error 处理
        let outcomes = slots
            .into_iter()
            .zip(student_ids)
            .map(|(slot, id)| slot.unwrap_or_else(|| StudentOutcome::ai_error(&id)))
            .collect();

        aggregate(outcomes)
    }
}

/// 按输入顺序汇总评分结果
pub fn aggregate(outcomes: Vec<StudentOutcome>) -> EvaluationResponse {
    let mut results = Vec::new();
    let mut total_score = 0.0;
    let mut tally = MistakeTally::default();
    let mut failed = 0;
    let mut skipped = 0;

    for outcome in outcomes {
        match outcome {
            StudentOutcome::Evaluated {
                result,
                numeric_score,
                mistakes,
            } => {
                total_score += numeric_score;
                for category in mistakes {
                    tally.record(category);
                }
                results.push(result);
            }
            StudentOutcome::AiError { result } => {
                failed += 1;
                results.push(result);
            }
            StudentOutcome::Skipped => skipped += 1,
        }
    }

    let class_average = score_parser::format_average(total_score, results.len());
    let common_mistakes = tally.top(MAX_COMMON_MISTAKES);
    let improvement_tip = improvement_tip(&common_mistakes);

    logging::log_batch_complete(results.len() - failed, failed, skipped, &class_average);

    EvaluationResponse {
        teacher_insights: TeacherInsights {
            class_average,
            total_students: results.len(),
            common_mistakes: if common_mistakes.is_empty() {
                vec!["None".to_string()]
            } else {
                common_mistakes
            },
            improvement_tip,
        },
        results,
    }
}

fn improvement_tip(common_mistakes: &[String]) -> String {
    if common_mistakes.is_empty() {
        "Excellent performance! No major gaps found.".to_string()
    } else {
        format!(
            "Class is struggling with: {}. Consider revising these topics.",
            common_mistakes.join(", ")
        )
    }
}
