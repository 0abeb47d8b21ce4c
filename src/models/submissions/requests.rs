use serde::Deserialize;
use ts_rs::TS;

use super::entities::{FileAttachment, SubmissionStatus};
use crate::models::common::pagination::deserialize_string_to_i64;

/// 创建提交请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct CreateSubmissionRequest {
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub rubric_id: Option<i64>,
    pub attachment: Option<FileAttachment>,
}

/// 更新提交请求
///
/// content 发生变化时会追加新版本；status 进入 submitted 时打上提交时间戳。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct UpdateSubmissionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub status: Option<SubmissionStatus>,
    pub rubric_id: Option<i64>,
    pub attachment: Option<FileAttachment>,
}

impl UpdateSubmissionRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.content.is_none()
            && self.status.is_none()
            && self.rubric_id.is_none()
            && self.attachment.is_none()
    }
}

/// 提交列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct SubmissionListQuery {
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub size: Option<i64>,
    pub status: Option<SubmissionStatus>,
    pub student_id: Option<i64>,
    pub rubric_id: Option<i64>,
}

fn deserialize_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialize_string_to_i64(deserializer).map(Some)
}
