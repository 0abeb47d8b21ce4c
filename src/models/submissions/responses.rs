use serde::Serialize;
use ts_rs::TS;

use super::entities::{Submission, SubmissionVersion};
use crate::models::PaginationInfo;

/// 提交者信息
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct SubmissionStudent {
    pub id: i64,
    pub email: String,
    pub display_name: Option<String>,
}

/// 提交列表项（包含提交者信息）
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct SubmissionListItem {
    #[serde(flatten)]
    pub submission: Submission,
    pub student: Option<SubmissionStudent>,
}

/// 提交列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionListItem>,
    pub pagination: PaginationInfo,
}

/// 版本历史响应（按版本号倒序，无分页）
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct SubmissionVersionListResponse {
    pub items: Vec<SubmissionVersion>,
}
