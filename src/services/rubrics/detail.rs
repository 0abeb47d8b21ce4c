use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RubricService;
use crate::models::rubrics::entities::Rubric;
use crate::models::users::entities::ActorContext;
use crate::models::{ApiResponse, ErrorCode};

/// 非公开的评分标准只对所有者和教职人员可见
pub(crate) fn check_rubric_read_permission(
    actor: &ActorContext,
    rubric: &Rubric,
) -> Result<(), HttpResponse> {
    if rubric.is_public || rubric.owner_id == actor.id || actor.role.is_staff() {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::PermissionDenied,
            "没有查看该评分标准的权限",
        )))
    }
}

/// 获取评分标准详情
/// GET /rubrics/{id}
pub async fn get_rubric(
    service: &RubricService,
    request: &HttpRequest,
    actor: ActorContext,
    rubric_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_rubric_by_id(rubric_id).await {
        Ok(Some(rubric)) => {
            if let Err(resp) = check_rubric_read_permission(&actor, &rubric) {
                return Ok(resp);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(rubric)))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::RubricNotFound,
            "评分标准不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询评分标准失败: {e}"),
            )),
        ),
    }
}
