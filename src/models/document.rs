use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::evaluation::{deserialize_text, StudentAnswer};

/// 上传的图片文件（base64）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UploadedFile {
    #[serde(default)]
    pub filename: String,
    /// base64 编码的文件内容
    #[serde(default)]
    pub data: String,
    /// MIME 类型，例如 image/jpeg
    #[serde(default, rename = "type")]
    pub mime_type: String,
}

/// OCR 请求：题目图片 + 答题卡图片
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDocsRequest {
    #[serde(default)]
    pub qp_list: Vec<UploadedFile>,
    #[serde(default)]
    pub ans_list: Vec<UploadedFile>,
}

/// OCR 结果：识别出的题目和每个学生的答案
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDocsResponse {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub question_text: String,
    #[serde(default)]
    pub students: Vec<StudentAnswer>,
}

impl ProcessDocsResponse {
    /// 从模型返回的 JSON 对象中读取，字段缺失或类型不符时退化为空值
    pub fn from_extracted(map: Map<String, Value>) -> Self {
        let question_text = map
            .get("questionText")
            .and_then(|v| deserialize_text(v.clone()).ok())
            .unwrap_or_default();

        let students = match map.get("students") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| serde_json::from_value::<StudentAnswer>(item.clone()).ok())
                .collect(),
            _ => Vec::new(),
        };

        Self {
            question_text,
            students,
        }
    }
}

/// 生成标准答案请求
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GenerateAnswerRequest {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub question: String,
}

/// 生成标准答案响应
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenerateAnswerResponse {
    pub answer: String,
}
