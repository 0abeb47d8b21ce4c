//! 评估实体
//!
//! 有意不声明外键：评估是独立的审计记录，提交删除后依然保留。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub submission_id: i64,
    pub submission_version: i32,
    pub rubric_id: Option<i64>,
    pub evaluator_id: i64,
    pub evaluator_type: String,
    pub status: String,
    // CriterionScore 列表的 JSON 序列化
    #[sea_orm(column_type = "Text", nullable)]
    pub criteria_scores: Option<String>,
    pub total_score: Option<f64>,
    pub max_possible_score: Option<f64>,
    pub percentage_score: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub grammar_feedback: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub clarity_feedback: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub structure_feedback: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub content_feedback: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub overall_feedback: Option<String>,
    // 建议条目列表的 JSON 序列化
    #[sea_orm(column_type = "Text", nullable)]
    pub suggestions: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub completed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_evaluation(self) -> crate::models::evaluations::entities::Evaluation {
        use crate::models::evaluations::entities::{
            Evaluation, EvaluationStatus, EvaluatorType,
        };
        use chrono::{DateTime, Utc};

        Evaluation {
            id: self.id,
            submission_id: self.submission_id,
            submission_version: self.submission_version,
            rubric_id: self.rubric_id,
            evaluator_id: self.evaluator_id,
            evaluator_type: self
                .evaluator_type
                .parse::<EvaluatorType>()
                .unwrap_or(EvaluatorType::Teacher),
            status: self
                .status
                .parse::<EvaluationStatus>()
                .unwrap_or(EvaluationStatus::Pending),
            criteria_scores: self
                .criteria_scores
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            total_score: self.total_score,
            max_score: self.max_possible_score,
            percentage: self.percentage_score,
            grammar_feedback: self.grammar_feedback,
            clarity_feedback: self.clarity_feedback,
            structure_feedback: self.structure_feedback,
            content_feedback: self.content_feedback,
            overall_feedback: self.overall_feedback,
            suggestions: self
                .suggestions
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
            completed_at: self
                .completed_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
        }
    }
}
