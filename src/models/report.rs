use serde::{Deserialize, Serialize};

use super::evaluation::EvaluationResult;

/// 成绩档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreBand {
    /// 8 分及以上
    Excellent,
    /// 5 分到 8 分之间
    Average,
    /// 低于 5 分
    NeedsWork,
}

/// 班级报告请求
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ClassReportRequest {
    #[serde(default)]
    pub results: Vec<EvaluationResult>,
}

/// 单个学生的报告行
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub student_id: String,
    pub score: String,
    pub band: ScoreBand,
    pub strength: String,
    pub weakness: String,
}

/// 班级层面的总结
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    pub total_students: usize,
    pub class_average: String,
    pub weak_area: String,
    pub strength: String,
    pub action: String,
    /// 按每份答卷 15 分钟估算，单位小时
    pub time_saved_hours: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassReport {
    pub rows: Vec<ReportRow>,
    pub summary: ClassSummary,
}
