use std::sync::Arc;
use std::time::Instant;

use crate::clients::AiGateway;
use crate::config::Config;
use crate::orchestrator::BatchEvaluator;
use crate::services::{AnswerService, OcrService};

/// 路由共享状态
///
/// 所有服务都持有同一个无状态的 AiGateway
#[derive(Clone)]
pub struct AppState {
    pub ocr: Arc<OcrService>,
    pub answers: Arc<AnswerService>,
    pub evaluator: Arc<BatchEvaluator>,
    pub model_name: String,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(gateway: Arc<dyn AiGateway>, config: &Config) -> Self {
        Self {
            model_name: gateway.model_name().to_string(),
            ocr: Arc::new(OcrService::new(gateway.clone())),
            answers: Arc::new(AnswerService::new(gateway.clone())),
            evaluator: Arc::new(BatchEvaluator::new(gateway, config)),
            started_at: Instant::now(),
        }
    }
}
