use serde::Serialize;
use ts_rs::TS;

use super::entities::Evaluation;
use crate::models::PaginationInfo;

/// 评估列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct EvaluationListResponse {
    pub items: Vec<Evaluation>,
    pub pagination: PaginationInfo,
}
