use serde::Deserialize;
use ts_rs::TS;

use super::entities::Criterion;
use crate::models::common::pagination::deserialize_string_to_i64;

/// 创建评分标准请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct CreateRubricRequest {
    pub title: String,
    pub description: Option<String>,
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub is_public: bool,
}

/// 更新评分标准请求
///
/// criteria 为整体替换，不支持单项修改。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct UpdateRubricRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub criteria: Option<Vec<Criterion>>,
    pub is_public: Option<bool>,
}

impl UpdateRubricRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.criteria.is_none()
            && self.is_public.is_none()
    }
}

/// 评分标准列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct RubricListQuery {
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub size: Option<i64>,
    pub owner_id: Option<i64>,
    pub is_public: Option<bool>,
}

fn deserialize_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialize_string_to_i64(deserializer).map(Some)
}
