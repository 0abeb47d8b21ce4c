use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AiService;
use crate::models::ai::responses::EvaluationStatusResponse;
use crate::models::evaluations::entities::EvaluationStatus;
use crate::models::users::entities::ActorContext;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::evaluations::detail::check_evaluation_read_permission;

/// 查询自动评估进度
/// GET /ai/evaluations/{id}/status
pub async fn evaluation_status(
    service: &AiService,
    request: &HttpRequest,
    actor: ActorContext,
    evaluation_id: i64,
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

    if let Err(resp) = check_evaluation_read_permission(&storage, &actor, &evaluation).await {
        return Ok(resp);
    }

    // 兜底完成的评估没有分数但带有可见的反馈，同样算有结果
    let response = EvaluationStatusResponse {
        evaluation_id: evaluation.id,
        status: evaluation.status,
        completed_at: evaluation.completed_at,
        has_results: evaluation.status == EvaluationStatus::Completed
            && (evaluation.total_score.is_some() || evaluation.overall_feedback.is_some()),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}
