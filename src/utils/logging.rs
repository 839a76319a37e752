/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化全局日志
///
/// 过滤规则取自 `RUST_LOG`，默认 `info`。重复调用不会报错
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 答题卡评分服务启动");
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 监听地址: {}", config.listen_addr());
    info!("🤖 模型: {}", config.llm_model_name);
    info!("📊 最大并发评分数: {}", config.max_concurrent_evaluations);
    info!("{}", "=".repeat(60));
}

/// 记录批量评分完成信息
pub fn log_batch_complete(evaluated: usize, failed: usize, skipped: usize, average: &str) {
    info!("{}", "─".repeat(60));
    info!(
        "✓ 批量评分完成: 评分 {} 人, AI 失败 {} 人, 跳过 {} 人",
        evaluated, failed, skipped
    );
    info!("📈 班级平均分: {}", average);
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
