pub mod document;
pub mod evaluation;
pub mod report;

pub use document::{
    GenerateAnswerRequest, GenerateAnswerResponse, ProcessDocsRequest, ProcessDocsResponse,
    UploadedFile,
};
pub use evaluation::{
    EvaluationRequest, EvaluationResponse, EvaluationResult, StudentAnswer, Strictness,
    TeacherInsights,
};
pub use report::{ClassReport, ClassReportRequest, ClassSummary, ReportRow, ScoreBand};
