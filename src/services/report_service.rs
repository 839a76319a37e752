//! 班级报告 - 业务能力层
//!
//! 对已有评分结果做展示用的分档和汇总，不调用模型、不做持久化

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{ClassReport, ClassSummary, EvaluationResult, ReportRow, ScoreBand};
use crate::services::score_parser;

/// 每份答卷节省的人工批改时间（分钟）
const MINUTES_SAVED_PER_SHEET: f64 = 15.0;

fn image_extension() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\.(jpg|jpeg|png)").expect("静态正则表达式"))
}

/// 去掉学生编号中的图片扩展名
pub fn clean_student_id(student_id: &str) -> String {
    image_extension().replace_all(student_id, "").into_owned()
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            ScoreBand::Excellent
        } else if score < 5.0 {
            ScoreBand::NeedsWork
        } else {
            ScoreBand::Average
        }
    }

    /// (优势, 不足)
    fn strength_and_weakness(self) -> (&'static str, &'static str) {
        match self {
            ScoreBand::Excellent => ("Concept Clarity", "None"),
            ScoreBand::Average => ("Basics", "Details"),
            ScoreBand::NeedsWork => ("Attempted", "Core Logic"),
        }
    }
}

/// 生成班级报告
///
/// 没有学生编号或编号为 "Unknown" 的结果不计入
pub fn build_report(results: &[EvaluationResult]) -> ClassReport {
    let mut rows = Vec::with_capacity(results.len());
    let mut total_score = 0.0;

    for result in results {
        if result.student_id.is_empty() || result.student_id == "Unknown" {
            continue;
        }

        let score = score_parser::parse_leading_number(&result.score).unwrap_or(0.0);
        total_score += score;

        let band = ScoreBand::from_score(score);
        let (strength, weakness) = band.strength_and_weakness();
        rows.push(ReportRow {
            student_id: clean_student_id(&result.student_id),
            score: if result.score.is_empty() {
                "0".to_string()
            } else {
                result.score.clone()
            },
            band,
            strength: strength.to_string(),
            weakness: weakness.to_string(),
        });
    }

    let summary = summarize(rows.len(), total_score);
    ClassReport { rows, summary }
}

fn summarize(total: usize, total_score: f64) -> ClassSummary {
    let average = if total > 0 {
        ((total_score / total as f64) * 10.0).round() / 10.0
    } else {
        0.0
    };

    let (weak_area, strength, action) = if average > 7.5 {
        ("Advanced Problems", "Strong Concepts", "Give tougher questions")
    } else if average < 5.0 {
        ("Basic Definitions", "Handwriting", "Revise Fundamentals")
    } else {
        ("Structure", "Accuracy", "Focus on formatting")
    };

    ClassSummary {
        total_students: total,
        class_average: score_parser::to_fixed_1(average),
        weak_area: weak_area.to_string(),
        strength: strength.to_string(),
        action: action.to_string(),
        time_saved_hours: score_parser::to_fixed_1(
            total as f64 * MINUTES_SAVED_PER_SHEET / 60.0,
        ),
    }
}
