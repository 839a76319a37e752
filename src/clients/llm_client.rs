//! LLM API 客户端
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 默认指向 Gemini 的 OpenAI 兼容端点，也可以换成任何兼容 OpenAI API 的服务
//! - 网络类错误使用 `backon` 做有限次数的指数退避重试

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, ImageDetail, ImageUrl,
        ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use tracing::{debug, warn};

use super::ai_gateway::{AiGateway, PromptPart};
use crate::config::Config;
use crate::error::LlmError;

/// LLM 客户端
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
    retry_attempts: usize,
    retry_min_delay: Duration,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
            retry_attempts: config.llm_retry_attempts.max(1),
            retry_min_delay: Duration::from_millis(config.llm_retry_min_delay_ms),
        }
    }

    /// 构建请求：所有内容放在同一条 user 消息里，并要求返回 JSON 对象
    fn build_request(&self, parts: &[PromptPart]) -> Result<CreateChatCompletionRequest, LlmError> {
        let content = match parts {
            [PromptPart::Text(text)] => ChatCompletionRequestUserMessageContent::Text(text.clone()),
            _ => ChatCompletionRequestUserMessageContent::Array(
                parts.iter().map(to_content_part).collect(),
            ),
        };

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| LlmError::RequestBuild(e.to_string()))?;

        CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .response_format(ResponseFormat::JsonObject)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| LlmError::RequestBuild(e.to_string()))
    }
}

fn to_content_part(part: &PromptPart) -> ChatCompletionRequestUserMessageContentPart {
    match part {
        PromptPart::Text(text) => ChatCompletionRequestUserMessageContentPart::Text(
            ChatCompletionRequestMessageContentPartText { text: text.clone() },
        ),
        PromptPart::Inline { data, mime_type } => {
            ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url: PromptPart::data_url(data, mime_type),
                        detail: Some(ImageDetail::High),
                    },
                },
            )
        }
    }
}

/// 只有网络层错误才值得重试，接口返回的错误重试也不会变
fn is_retryable(e: &OpenAIError) -> bool {
    matches!(e, OpenAIError::Reqwest(_))
}

#[async_trait]
impl AiGateway for LlmClient {
    async fn generate(&self, parts: &[PromptPart]) -> Result<String, LlmError> {
        let attachments = parts
            .iter()
            .filter(|p| matches!(p, PromptPart::Inline { .. }))
            .count();
        debug!(
            "调用 LLM API，模型: {}，内容段数: {}，附件数: {}",
            self.model_name,
            parts.len(),
            attachments
        );

        let request = self.build_request(parts)?;

        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.retry_min_delay)
            .with_max_times(self.retry_attempts.saturating_sub(1));

        let response = (|| async { self.client.chat().create(request.clone()).await })
            .retry(&backoff)
            .when(is_retryable)
            .notify(|e: &OpenAIError, dur: Duration| {
                warn!("LLM API 网络错误，{:?} 后重试: {}", dur, e);
            })
            .await
            .map_err(|e| {
                warn!("LLM API 调用失败: {}", e);
                LlmError::ApiCallFailed {
                    model: self.model_name.clone(),
                    transient: is_retryable(&e),
                    message: e.to_string(),
                }
            })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
