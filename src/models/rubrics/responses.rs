use serde::Serialize;
use ts_rs::TS;

use super::entities::Rubric;
use crate::models::PaginationInfo;

/// 评分标准列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct RubricListResponse {
    pub items: Vec<Rubric>,
    pub pagination: PaginationInfo,
}
