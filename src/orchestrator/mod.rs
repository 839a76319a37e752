//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! api (HTTP 路由)
//!     ↓
//! orchestrator::BatchEvaluator (处理 Vec<StudentAnswer>)
//!     ↓
//! workflow::StudentFlow (处理单个学生)
//!     ↓
//! services (能力层：prompt / classifier / score)
//!     ↓
//! clients (AiGateway)
//! ```
//!
//! 只做调度和汇总，不做具体评分判断

pub mod batch_evaluator;

pub use batch_evaluator::{aggregate, BatchEvaluator};
