use serde::Deserialize;
use ts_rs::TS;

/// 快速反馈请求（不落库，文本不少于 50 字符）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct QuickFeedbackRequest {
    pub text: String,
}
