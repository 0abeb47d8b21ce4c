use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use super::complete::finish_evaluation;
use crate::models::evaluations::entities::EvaluationStatus;
use crate::models::evaluations::requests::{EvaluationPatch, UpdateEvaluationRequest};
use crate::models::users::entities::{ActorContext, UserRole};
use crate::models::{ApiResponse, ErrorCode};

/// 更新进行中的评估（暂存分数与评语）
/// PUT /evaluations/{id}
///
/// status 置为 completed 时走与 complete 相同的结算路径。
pub async fn update_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    actor: ActorContext,
    evaluation_id: i64,
    update: UpdateEvaluationRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if update.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::Validation,
            "更新内容不能为空",
        )));
    }

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
            "只有评估执行人可以修改评估",
        )));
    }

    // 已完成的评估是不可变的审计记录
    if evaluation.status.is_terminal() {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::InvalidStateTransition,
            "评估已完成，不能再修改",
        )));
    }

    if let Some(next) = update.status {
        if !evaluation.status.can_transition_to(next) {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::InvalidStateTransition,
                format!("评估状态不能从 {} 迁移到 {next}", evaluation.status),
            )));
        }
        if next == EvaluationStatus::Completed {
            return match finish_evaluation(
                &storage,
                &evaluation,
                update.criteria_scores,
                update.overall_feedback,
                update.structure_feedback,
                update.content_feedback,
            )
            .await
            {
                Ok(completed) => Ok(HttpResponse::Ok().json(ApiResponse::success(completed))),
                Err(resp) => Ok(resp),
            };
        }
    }

    // 总分更新时重新计算百分比，分母优先取本次给出的 max_score
    let max_score = update.max_score.or(evaluation.max_score);
    let percentage = update.total_score.and_then(|total| {
        max_score.filter(|max| *max > 0.0).map(|max| total / max * 100.0)
    });

    let patch = EvaluationPatch {
        status: update.status,
        criteria_scores: update.criteria_scores,
        total_score: update.total_score,
        max_score: update.max_score,
        percentage,
        overall_feedback: update.overall_feedback,
        structure_feedback: update.structure_feedback,
        content_feedback: update.content_feedback,
        ..Default::default()
    };

    match storage.update_evaluation(evaluation_id, patch).await {
        Ok(Some(updated)) => Ok(HttpResponse::Ok().json(ApiResponse::success(updated))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotFound,
            "评估不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("更新评估失败: {e}"),
            )),
        ),
    }
}
