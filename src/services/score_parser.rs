//! 分数解析
//!
//! 模型返回的分数通常是 "X/10" 形式的字符串，也可能直接是数字

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

fn leading_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?").expect("静态正则表达式")
    })
}

/// 读取文本开头的数字，忽略前导空白；读不到时返回 None
///
/// `"7.5/10"` → 7.5，`" 8 "` → 8，`"abc"` → None
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let m = leading_number().find(text.trim_start())?;
    m.as_str().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// 将 JSON 中的分数转换为参与平均分计算的数值，无法解析时为 0
pub fn numeric_score(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_leading_number(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// 分数的展示文本，缺失、空字符串或 0 时使用 "0/10"
pub fn display_score(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        _ => "0/10".to_string(),
    }
}

/// 保留一位小数，按浮点数的精确二进制值取整
///
/// 只有 .25 和 .75 这类能精确表示的中点才算平局，平局时向远离零的方向取整；
/// 0.35 实际略小于 0.35，所以得到 "0.3"
pub fn to_fixed_1(x: f64) -> String {
    let is_tie = (x * 4.0).fract() == 0.0 && (x * 2.0).fract() != 0.0;
    if is_tie {
        format!("{:.1}", (x * 10.0).round() / 10.0)
    } else {
        format!("{:.1}", x)
    }
}

/// 平均分格式化为 "X.X/10"，结果为空时是 "0.0/10"
pub fn format_average(total: f64, count: usize) -> String {
    format!("{}/10", to_fixed_1(total / count.max(1) as f64))
}
