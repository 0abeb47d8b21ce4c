use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::evaluations::entities::{EvaluationStatus, EvaluatorType};
use crate::models::evaluations::requests::{CreateEvaluationRequest, NewEvaluation};
use crate::models::submissions::entities::SubmissionStatus;
use crate::models::users::entities::ActorContext;
use crate::models::{ApiResponse, ErrorCode};

/// 发起一次教师评估
/// POST /evaluations
///
/// 同一提交同一评估方类型同时只允许一个未完成的评估。
/// 评估创建后提交由 submitted 进入 under_review。
pub async fn create_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    actor: ActorContext,
    req: CreateEvaluationRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if !actor.role.is_staff() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::PermissionDenied,
            "只有教师或管理员可以发起评估",
        )));
    }

    let submission = match storage.get_submission_by_id(req.submission_id).await {
        Ok(Some(sub)) => sub,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "提交不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交失败: {e}"),
                )),
            );
        }
    };

    if !submission.status.can_be_evaluated() {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::InvalidStateTransition,
            format!("{} 状态下的提交不能被评估", submission.status),
        )));
    }

    match storage
        .find_active_evaluation(submission.id, EvaluatorType::Teacher)
        .await
    {
        Ok(Some(active)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::EvaluationInFlight,
                format!("该提交已有未完成的教师评估 (id={})", active.id),
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询进行中的评估失败: {e}"),
                )),
            );
        }
    }

    // 请求未指定评分标准时沿用提交自带的标准
    let rubric_id = req.rubric_id.or(submission.rubric_id);
    if let Some(rid) = rubric_id {
        match storage.get_rubric_by_id(rid).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::Validation,
                    "Referenced rubric does not exist",
                )));
            }
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("查询评分标准失败: {e}"),
                    )),
                );
            }
        }
    }

    let new_evaluation = NewEvaluation {
        submission_id: submission.id,
        submission_version: submission.current_version,
        rubric_id,
        evaluator_id: actor.id,
        evaluator_type: EvaluatorType::Teacher,
        status: EvaluationStatus::Pending,
    };

    let evaluation = match storage.create_evaluation(new_evaluation).await {
        Ok(evaluation) => evaluation,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("创建评估失败: {e}"),
                )),
            );
        }
    };

    if submission.status == SubmissionStatus::Submitted
        && let Err(e) = storage
            .set_submission_status(submission.id, SubmissionStatus::UnderReview)
            .await
    {
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("更新提交状态失败: {e}"),
            )),
        );
    }

    Ok(HttpResponse::Created().json(ApiResponse::success(evaluation)))
}
