//! 学生评分上下文
//!
//! 封装"我正在评第几个学生"这一信息

use std::fmt::Display;

use crate::models::Strictness;

/// 同一批次内所有学生共享的评分依据
#[derive(Debug, Clone)]
pub struct GradingBrief {
    pub question: String,
    pub model_answer: String,
    pub strictness: Strictness,
}

/// 单个学生的上下文
#[derive(Debug, Clone)]
pub struct StudentCtx {
    /// 在请求中的位置（从0开始）
    pub index: usize,
    pub student_id: String,
}

impl StudentCtx {
    pub fn new(index: usize, student_id: impl Into<String>) -> Self {
        Self {
            index,
            student_id: student_id.into(),
        }
    }
}

impl Display for StudentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[学生 #{} {}]", self.index + 1, self.student_id)
    }
}
