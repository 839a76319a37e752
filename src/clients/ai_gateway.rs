//! AI 网关抽象
//!
//! 所有服务只依赖这个 trait，真实实现见 [`LlmClient`](super::LlmClient)，测试中替换为假实现

use async_trait::async_trait;

use crate::error::LlmError;

/// 请求中的一段内容
#[derive(Debug, Clone, PartialEq)]
pub enum PromptPart {
    /// 纯文本
    Text(String),
    /// 内联二进制附件（base64 + MIME 类型）
    Inline { data: String, mime_type: String },
}

impl PromptPart {
    pub fn text(text: impl Into<String>) -> Self {
        PromptPart::Text(text.into())
    }

    pub fn inline(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        PromptPart::Inline {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// 转成 data URL，供兼容 OpenAI 的图片输入使用
    pub fn data_url(data: &str, mime_type: &str) -> String {
        format!("data:{};base64,{}", mime_type, data)
    }
}

/// 生成式 AI 调用
///
/// 实现必须无状态、可跨请求复用
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// 按顺序发送各段内容，返回模型的原始文本输出
    async fn generate(&self, parts: &[PromptPart]) -> Result<String, LlmError>;

    /// 只有一段文本时的简写
    async fn generate_text(&self, prompt: &str) -> Result<String, LlmError> {
        self.generate(&[PromptPart::text(prompt)]).await
    }

    /// 使用的模型名称（仅用于日志和健康检查）
    fn model_name(&self) -> &str;
}
