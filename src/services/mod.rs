pub mod answer_service;
pub mod mistake_classifier;
pub mod ocr_service;
pub mod prompt_builder;
pub mod report_service;
pub mod score_parser;

pub use answer_service::AnswerService;
pub use mistake_classifier::{KeywordClassifier, MistakeClassifier, MistakeTally};
pub use ocr_service::OcrService;
