//! 评估存储操作

use super::SeaOrmStorage;
use crate::entity::evaluations::{ActiveModel, Column, Entity as Evaluations};
use crate::errors::{EvalHubError, Result};
use crate::models::{
    PaginationInfo,
    evaluations::{
        entities::{Evaluation, EvaluationStatus, EvaluatorType},
        requests::{EvaluationListQuery, EvaluationPatch, NewEvaluation},
        responses::EvaluationListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建评估
    pub async fn create_evaluation_impl(&self, new: NewEvaluation) -> Result<Evaluation> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            submission_id: Set(new.submission_id),
            submission_version: Set(new.submission_version),
            rubric_id: Set(new.rubric_id),
            evaluator_id: Set(new.evaluator_id),
            evaluator_type: Set(new.evaluator_type.to_string()),
            status: Set(new.status.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("创建评估失败: {e}")))?;

        Ok(result.into_evaluation())
    }

    /// 通过 ID 获取评估
    pub async fn get_evaluation_by_id_impl(&self, id: i64) -> Result<Option<Evaluation>> {
        let result = Evaluations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询评估失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluation()))
    }

    /// 查找提交上同一执行方类型的未完成评估
    pub async fn find_active_evaluation_impl(
        &self,
        submission_id: i64,
        evaluator_type: EvaluatorType,
    ) -> Result<Option<Evaluation>> {
        let result = Evaluations::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .filter(Column::EvaluatorType.eq(evaluator_type.to_string()))
            .filter(Column::Status.ne(EvaluationStatus::Completed.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询进行中评估失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluation()))
    }

    /// 按补丁更新评估
    pub async fn update_evaluation_impl(
        &self,
        id: i64,
        patch: EvaluationPatch,
    ) -> Result<Option<Evaluation>> {
        let now = chrono::Utc::now().timestamp();

        let Some(found) = Evaluations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询评估失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = found.into();

        if let Some(status) = patch.status {
            model.status = Set(status.to_string());
        }
        if let Some(ref scores) = patch.criteria_scores {
            let json = serde_json::to_string(scores)
                .map_err(|e| EvalHubError::serialization(format!("序列化评分明细失败: {e}")))?;
            model.criteria_scores = Set(Some(json));
        }
        if let Some(total) = patch.total_score {
            model.total_score = Set(Some(total));
        }
        if let Some(max) = patch.max_score {
            model.max_possible_score = Set(Some(max));
        }
        if let Some(percentage) = patch.percentage {
            model.percentage_score = Set(Some(percentage));
        }
        if let Some(grammar) = patch.grammar_feedback {
            model.grammar_feedback = Set(Some(grammar));
        }
        if let Some(clarity) = patch.clarity_feedback {
            model.clarity_feedback = Set(Some(clarity));
        }
        if let Some(structure) = patch.structure_feedback {
            model.structure_feedback = Set(Some(structure));
        }
        if let Some(content) = patch.content_feedback {
            model.content_feedback = Set(Some(content));
        }
        if let Some(feedback) = patch.overall_feedback {
            model.overall_feedback = Set(Some(feedback));
        }
        if let Some(ref suggestions) = patch.suggestions {
            let json = serde_json::to_string(suggestions)
                .map_err(|e| EvalHubError::serialization(format!("序列化建议列表失败: {e}")))?;
            model.suggestions = Set(Some(json));
        }
        if let Some(completed_at) = patch.completed_at {
            model.completed_at = Set(Some(completed_at.timestamp()));
        }
        model.updated_at = Set(now);

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("更新评估失败: {e}")))?;

        Ok(Some(result.into_evaluation()))
    }

    /// 分页列出评估
    ///
    /// visible_to 非空时限定为该用户自己提交上的评估。
    pub async fn list_evaluations_with_pagination_impl(
        &self,
        query: EvaluationListQuery,
        visible_to: Option<i64>,
    ) -> Result<EvaluationListResponse> {
        use crate::entity::submissions;
        use sea_orm::sea_query::Query as SubQuery;

        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Evaluations::find();

        if let Some(submission_id) = query.submission_id {
            select = select.filter(Column::SubmissionId.eq(submission_id));
        }

        if let Some(student_id) = visible_to {
            select = select.filter(
                Column::SubmissionId.in_subquery(
                    SubQuery::select()
                        .column(submissions::Column::Id)
                        .from(submissions::Entity)
                        .and_where(submissions::Column::StudentId.eq(student_id))
                        .to_owned(),
                ),
            );
        }

        if let Some(evaluator_type) = query.evaluator_type {
            select = select.filter(Column::EvaluatorType.eq(evaluator_type.to_string()));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select.order_by_desc(Column::UpdatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询评估总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询评估页数失败: {e}")))?;

        let evaluations = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询评估列表失败: {e}")))?;

        Ok(EvaluationListResponse {
            items: evaluations.into_iter().map(|m| m.into_evaluation()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }
}
