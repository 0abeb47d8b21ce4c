use serde::Serialize;
use ts_rs::TS;

use crate::models::evaluations::entities::EvaluationStatus;

/// 自动评估受理响应（202）
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct AiEvaluateResponse {
    pub evaluation_id: i64,
    pub status: EvaluationStatus,
}

/// 自动评估进度响应
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct EvaluationStatusResponse {
    pub evaluation_id: i64,
    pub status: EvaluationStatus,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub has_results: bool,
}

/// 快速反馈响应
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct QuickFeedbackResponse {
    pub grammar_feedback: String,
    pub clarity_feedback: String,
    pub suggestions: Vec<String>,
}
