use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

/// 评分宽严模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    Strict,
    #[default]
    Moderate,
    Lenient,
}

impl Strictness {
    /// 从请求中的字符串解析，大小写不敏感，无法识别时使用 Moderate
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("strict") => Strictness::Strict,
            Some("lenient") => Strictness::Lenient,
            _ => Strictness::Moderate,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Strictness::Strict => "Strict",
            Strictness::Moderate => "Moderate",
            Strictness::Lenient => "Lenient",
        }
    }

    /// 该模式附加的评分指令
    pub fn instruction(self) -> Option<&'static str> {
        match self {
            Strictness::Strict => Some("Deduct marks heavily."),
            Strictness::Lenient => Some("Ignore minor errors."),
            Strictness::Moderate => None,
        }
    }
}

impl<'de> Deserialize<'de> for Strictness {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // 非字符串的值一律按 Moderate 处理
        let value = Value::deserialize(deserializer)?;
        Ok(Strictness::from_label(value.as_str()))
    }
}

/// 学生答案
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StudentAnswer {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub student_id: String,
    #[serde(default, deserialize_with = "deserialize_opt_text")]
    pub answer_text: Option<String>,
}

/// 答案少于该字符数的学生不参与评分
pub const MIN_ANSWER_CHARS: usize = 5;

impl StudentAnswer {
    pub fn new(student_id: impl Into<String>, answer_text: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            answer_text: Some(answer_text.into()),
        }
    }

    /// 从任意 JSON 元素宽松地构建
    ///
    /// 非对象元素或无法识别的 `answerText` 都得到 `answer_text: None`，之后会被跳过
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };
        Self {
            student_id: map.get("studentId").and_then(scalar_text).unwrap_or_default(),
            answer_text: map.get("answerText").and_then(scalar_text),
        }
    }

    /// 返回可评分的答案文本；缺失或过短时返回 None
    pub fn gradable_text(&self) -> Option<&str> {
        self.answer_text
            .as_deref()
            .filter(|text| text.chars().count() >= MIN_ANSWER_CHARS)
    }
}

/// 批量评分请求
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub question: String,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub model_answer: String,
    #[serde(deserialize_with = "deserialize_students")]
    pub students: Vec<StudentAnswer>,
    #[serde(default)]
    pub strictness: Strictness,
}

impl EvaluationRequest {
    /// 从原始请求体构建
    ///
    /// `students` 缺失或不是数组时返回 400 错误
    pub fn from_body(body: Value) -> Result<Self> {
        match body.get("students") {
            Some(Value::Array(_)) => {}
            _ => return Err(AppError::validation("No students provided")),
        }
        serde_json::from_value(body)
            .map_err(|e| AppError::validation(format!("Invalid evaluation request: {}", e)))
    }
}

/// 单个学生的评分结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub student_id: String,
    /// 形如 "X/10"
    #[serde(default, deserialize_with = "deserialize_text")]
    pub score: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub feedback: String,
}

/// 班级整体分析
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeacherInsights {
    /// 形如 "X.X/10"
    pub class_average: String,
    pub total_students: usize,
    pub common_mistakes: Vec<String>,
    pub improvement_tip: String,
}

/// 批量评分响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResponse {
    pub results: Vec<EvaluationResult>,
    pub teacher_insights: TeacherInsights,
}

/// 字符串、数字、布尔按文本读取，其它类型返回 None
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn deserialize_lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value).unwrap_or_default())
}

/// 单个元素格式不对只影响该学生，不影响整批
fn deserialize_students<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<StudentAnswer>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let items = Vec::<Value>::deserialize(deserializer)?;
    Ok(items.iter().map(StudentAnswer::from_value).collect())
}

/// 数字或字符串都按文本读取，null 视为空字符串
pub(crate) fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(deserialize_opt_text(deserializer)?.unwrap_or_default())
}

pub(crate) fn deserialize_opt_text<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(D::Error::custom(format!(
            "expected text, got {}",
            match other {
                Value::Array(_) => "array",
                _ => "object",
            }
        ))),
    }
}
