use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::evaluations::entities::Evaluation;
use crate::models::users::entities::ActorContext;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 评估对执行人、教职人员和对应提交的作者可见
pub(crate) async fn check_evaluation_read_permission(
    storage: &std::sync::Arc<dyn Storage>,
    actor: &ActorContext,
    evaluation: &Evaluation,
) -> Result<(), HttpResponse> {
    if evaluation.evaluator_id == actor.id || actor.role.is_staff() {
        return Ok(());
    }

    match storage.get_submission_by_id(evaluation.submission_id).await {
        Ok(Some(submission)) if submission.student_id == actor.id => Ok(()),
        Ok(_) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::PermissionDenied,
            "没有查看该评估的权限",
        ))),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询提交失败: {e}"),
            )),
        ),
    }
}

/// 获取评估详情
/// GET /evaluations/{id}
pub async fn get_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    actor: ActorContext,
    evaluation_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_evaluation_by_id(evaluation_id).await {
        Ok(Some(evaluation)) => {
            if let Err(resp) =
                check_evaluation_read_permission(&storage, &actor, &evaluation).await
            {
                return Ok(resp);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(evaluation)))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotFound,
            "评估不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询评估失败: {e}"),
            )),
        ),
    }
}
