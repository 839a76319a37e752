//! # Answer Grader
//!
//! 帮助老师批改答题卡的 HTTP 服务：图片识别、生成标准答案、按评分标准批量打分
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 持有外部资源，只暴露能力
//! - `AiGateway` - 生成式 AI 调用的唯一入口，`LlmClient` 为真实实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `prompt_builder` - 提示词模板
//! - `MistakeClassifier` - 评语中的错误类型识别
//! - `OcrService` / `AnswerService` - 识别答题卡、生成标准答案
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个学生"的完整评分流程
//! - `StudentFlow` - 提示词 → 模型 → 宽松解析 → 结果
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_evaluator` - 批量评分，控制并发并汇总班级数据
//!
//! ### ⑤ 接口层（API）
//! - `api/` - axum 路由和处理函数

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use api::{create_router, AppState};
pub use clients::{AiGateway, LlmClient, PromptPart};
pub use config::Config;
pub use error::{AppError, LlmError, Result};
pub use orchestrator::BatchEvaluator;
pub use utils::logging;
pub use workflow::{StudentFlow, StudentOutcome};
