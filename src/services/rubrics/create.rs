use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RubricService;
use crate::models::rubrics::requests::CreateRubricRequest;
use crate::models::users::entities::ActorContext;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{assign_criterion_ids, validate_criteria};

/// 创建评分标准
/// POST /rubrics
///
/// 仅教师和管理员可创建。权重之和必须恰好为 100。
pub async fn create_rubric(
    service: &RubricService,
    request: &HttpRequest,
    actor: ActorContext,
    mut req: CreateRubricRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if !actor.role.is_staff() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::PermissionDenied,
            "只有教师或管理员可以创建评分标准",
        )));
    }

    if req.title.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::Validation,
            "Title must not be empty",
        )));
    }

    if let Err(msg) = validate_criteria(&req.criteria) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::RubricWeightInvalid, msg)));
    }

    assign_criterion_ids(&mut req.criteria);

    match storage.create_rubric(actor.id, req).await {
        Ok(rubric) => Ok(HttpResponse::Created().json(ApiResponse::success(rubric))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("创建评分标准失败: {e}"),
            )),
        ),
    }
}
