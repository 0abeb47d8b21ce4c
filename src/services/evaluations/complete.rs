use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::EvaluationService;
use crate::models::evaluations::entities::{CriterionScore, Evaluation, EvaluationStatus};
use crate::models::evaluations::requests::{CompleteEvaluationRequest, EvaluationPatch};
use crate::models::submissions::entities::SubmissionStatus;
use crate::models::users::entities::{ActorContext, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 完成评估
/// POST /evaluations/{id}/complete
pub async fn complete_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    actor: ActorContext,
    evaluation_id: i64,
    req: CompleteEvaluationRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let evaluation = match storage.get_evaluation_by_id(evaluation_id).await {
        Ok(Some(evaluation)) => evaluation,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EvaluationNotFound,
                "评估不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询评估失败: {e}"),
                )),
            );
        }
    };

    if evaluation.evaluator_id != actor.id && actor.role != UserRole::Admin {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::PermissionDenied,
            "只有评估执行人可以完成评估",
        )));
    }

    if evaluation.status.is_terminal() {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::InvalidStateTransition,
            "评估已完成，不能重复完成",
        )));
    }

    match finish_evaluation(
        &storage,
        &evaluation,
        req.criteria_scores,
        req.overall_feedback,
        req.structure_feedback,
        req.content_feedback,
    )
    .await
    {
        Ok(completed) => Ok(HttpResponse::Ok().json(ApiResponse::success(completed))),
        Err(resp) => Ok(resp),
    }
}

/// 结算评估：校验分数、计算总分、落库并把提交推进到 evaluated。
///
/// update（status=completed）与 complete 两条路径共用。
pub(crate) async fn finish_evaluation(
    storage: &Arc<dyn Storage>,
    evaluation: &Evaluation,
    criteria_scores: Option<Vec<CriterionScore>>,
    overall_feedback: Option<String>,
    structure_feedback: Option<String>,
    content_feedback: Option<String>,
) -> Result<Evaluation, HttpResponse> {
    // 本次请求未带分数时沿用评估上已保存的分数
    let scores = criteria_scores.unwrap_or_else(|| evaluation.criteria_scores.clone());

    for cs in &scores {
        if cs.score < 0.0 || cs.score > cs.max_score {
            return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::Validation,
                format!(
                    "评分项 '{}' 的得分 {} 超出范围 [0, {}]",
                    cs.criterion_name, cs.score, cs.max_score
                ),
            )));
        }
    }

    let total_score: f64 = scores.iter().map(|cs| cs.score).sum();

    // 有评分标准时用标准的满分，否则用各项满分之和
    let max_score = match evaluation.rubric_id {
        Some(rid) => match storage.get_rubric_by_id(rid).await {
            Ok(Some(rubric)) => rubric.max_total_score,
            Ok(None) => scores.iter().map(|cs| cs.max_score).sum(),
            Err(e) => {
                return Err(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("查询评分标准失败: {e}"),
                    )),
                );
            }
        },
        None => scores.iter().map(|cs| cs.max_score).sum(),
    };

    let percentage = if max_score > 0.0 {
        total_score / max_score * 100.0
    } else {
        0.0
    };

    let patch = EvaluationPatch {
        status: Some(EvaluationStatus::Completed),
        criteria_scores: Some(scores),
        total_score: Some(total_score),
        max_score: Some(max_score),
        percentage: Some(percentage),
        overall_feedback,
        structure_feedback,
        content_feedback,
        completed_at: Some(chrono::Utc::now()),
        ..Default::default()
    };

    let completed = match storage.update_evaluation(evaluation.id, patch).await {
        Ok(Some(completed)) => completed,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EvaluationNotFound,
                "评估不存在",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("完成评估失败: {e}"),
                )),
            );
        }
    };

    // 完成评估时提交无条件推进到 evaluated；提交可能已被删除，评估作为审计记录仍然保留
    if let Ok(Some(submission)) = storage.get_submission_by_id(evaluation.submission_id).await
        && let Err(e) = storage
            .set_submission_status(submission.id, SubmissionStatus::Evaluated)
            .await
    {
        tracing::warn!(
            submission_id = submission.id,
            "Failed to advance submission to evaluated: {e}"
        );
    }

    Ok(completed)
}
