use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use answer_grader::{create_router, logging, AppState, Config, LlmClient};

#[tokio::main]
async fn main() -> Result<()> {
    // 读取 .env（不存在时忽略）
    let _ = dotenvy::dotenv();

    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::load()?;
    if !config.has_api_key() {
        warn!("⚠️ 未配置 GEMINI_API_KEY，所有 AI 调用都会失败");
    }
    logging::log_startup(&config);

    let gateway = Arc::new(LlmClient::new(&config));
    let state = AppState::new(gateway, &config);
    let app = create_router(state, config.body_limit_bytes);

    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("无法监听 {}", config.listen_addr()))?;
    info!("✓ 服务已启动: http://{}", config.listen_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("服务异常退出")?;

    info!("👋 服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听退出信号: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到退出信号，正在关闭...");
}
