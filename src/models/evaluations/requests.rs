use serde::Deserialize;
use ts_rs::TS;

use super::entities::{CriterionScore, EvaluationStatus, EvaluatorType};
use crate::models::common::pagination::deserialize_string_to_i64;

/// 创建（教师）评估请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct CreateEvaluationRequest {
    pub submission_id: i64,
    pub rubric_id: Option<i64>,
}

/// 更新评估请求
///
/// status 被置为 completed 时等同于调用 complete 接口。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct UpdateEvaluationRequest {
    pub status: Option<EvaluationStatus>,
    pub criteria_scores: Option<Vec<CriterionScore>>,
    pub total_score: Option<f64>,
    pub max_score: Option<f64>,
    pub overall_feedback: Option<String>,
    pub structure_feedback: Option<String>,
    pub content_feedback: Option<String>,
}

impl UpdateEvaluationRequest {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.criteria_scores.is_none()
            && self.total_score.is_none()
            && self.max_score.is_none()
            && self.overall_feedback.is_none()
            && self.structure_feedback.is_none()
            && self.content_feedback.is_none()
    }
}

/// 完成评估请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct CompleteEvaluationRequest {
    pub criteria_scores: Option<Vec<CriterionScore>>,
    pub overall_feedback: Option<String>,
    pub structure_feedback: Option<String>,
    pub content_feedback: Option<String>,
}

/// 存储层创建评估的数据（服务层组装，不直接来自请求体）
#[derive(Debug, Clone)]
pub struct NewEvaluation {
    pub submission_id: i64,
    pub submission_version: i32,
    pub rubric_id: Option<i64>,
    pub evaluator_id: i64,
    pub evaluator_type: EvaluatorType,
    pub status: EvaluationStatus,
}

/// 存储层更新评估的补丁，None 字段保持不变
#[derive(Debug, Clone, Default)]
pub struct EvaluationPatch {
    pub status: Option<EvaluationStatus>,
    pub criteria_scores: Option<Vec<CriterionScore>>,
    pub total_score: Option<f64>,
    pub max_score: Option<f64>,
    pub percentage: Option<f64>,
    pub grammar_feedback: Option<String>,
    pub clarity_feedback: Option<String>,
    pub structure_feedback: Option<String>,
    pub content_feedback: Option<String>,
    pub overall_feedback: Option<String>,
    pub suggestions: Option<Vec<String>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// 评估列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct EvaluationListQuery {
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub size: Option<i64>,
    pub submission_id: Option<i64>,
    pub evaluator_type: Option<EvaluatorType>,
    pub status: Option<EvaluationStatus>,
}

fn deserialize_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialize_string_to_i64(deserializer).map(Some)
}
