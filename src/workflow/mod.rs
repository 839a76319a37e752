pub mod student_ctx;
pub mod student_flow;

pub use student_ctx::{GradingBrief, StudentCtx};
pub use student_flow::{StudentFlow, StudentOutcome};
