/// 程序配置
///
/// 加载顺序：内置默认值 → TOML 配置文件（可选） → 环境变量覆盖
use serde::Deserialize;
use std::path::Path;

use crate::error::{AppError, Result};

/// 默认配置文件名（位于工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "grader.toml";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 监听地址
    pub bind_addr: String,
    /// 监听端口
    pub port: u16,
    /// 请求体大小上限（字节），答题卡图片以 base64 形式上传
    pub body_limit_bytes: usize,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    /// 瞬时错误的最大重试次数
    pub llm_retry_attempts: usize,
    /// 首次重试前的等待时间（毫秒）
    pub llm_retry_min_delay_ms: u64,
    // --- 批量评分配置 ---
    /// 同时评分的学生数量
    pub max_concurrent_evaluations: usize,
    /// 单个学生评分的超时时间（秒）
    pub student_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 3004,
            body_limit_bytes: 100 * 1024 * 1024,
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-2.5-flash".to_string(),
            llm_temperature: 0.3,
            llm_max_tokens: 8192,
            llm_retry_attempts: 3,
            llm_retry_min_delay_ms: 500,
            max_concurrent_evaluations: 4,
            student_timeout_secs: 60,
        }
    }
}

impl Config {
    /// 按完整顺序加载配置
    ///
    /// `GRADER_CONFIG` 指定配置文件路径；未指定时若工作目录存在 `grader.toml` 则读取它
    pub fn load() -> Result<Self> {
        let base = match std::env::var("GRADER_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            Err(_) => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// 只使用默认值 + 环境变量
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件读取配置，缺失字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("无法读取配置文件 {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| AppError::Config(format!("{} ({})", e, path.display())))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("无法解析配置文件: {}", e)))
    }

    fn with_env_overrides(self) -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("LLM_API_KEY"))
            .unwrap_or(self.llm_api_key);

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(self.bind_addr),
            port: env_parse("PORT").unwrap_or(self.port),
            body_limit_bytes: env_parse("BODY_LIMIT_BYTES").unwrap_or(self.body_limit_bytes),
            llm_api_key: api_key,
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            llm_temperature: env_parse("LLM_TEMPERATURE").unwrap_or(self.llm_temperature),
            llm_max_tokens: env_parse("LLM_MAX_TOKENS").unwrap_or(self.llm_max_tokens),
            llm_retry_attempts: env_parse("LLM_RETRY_ATTEMPTS").unwrap_or(self.llm_retry_attempts),
            llm_retry_min_delay_ms: env_parse("LLM_RETRY_MIN_DELAY_MS")
                .unwrap_or(self.llm_retry_min_delay_ms),
            max_concurrent_evaluations: env_parse("MAX_CONCURRENT_EVALUATIONS")
                .unwrap_or(self.max_concurrent_evaluations),
            student_timeout_secs: env_parse("STUDENT_TIMEOUT_SECS")
                .unwrap_or(self.student_timeout_secs),
        }
    }

    /// 是否配置了 API 密钥
    pub fn has_api_key(&self) -> bool {
        !self.llm_api_key.trim().is_empty()
    }

    /// 监听地址字符串，例如 `0.0.0.0:3004`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
