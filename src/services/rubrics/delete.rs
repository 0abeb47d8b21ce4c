use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RubricService;
use crate::models::users::entities::{ActorContext, UserRole};
use crate::models::{ApiResponse, ErrorCode};

/// 删除评分标准
/// DELETE /rubrics/{id}
///
/// 被提交引用的评分标准不允许删除。
pub async fn delete_rubric(
    service: &RubricService,
    request: &HttpRequest,
    actor: ActorContext,
    rubric_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let rubric = match storage.get_rubric_by_id(rubric_id).await {
        Ok(Some(rubric)) => rubric,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::RubricNotFound,
                "评分标准不存在",
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
    };

    if rubric.owner_id != actor.id && actor.role != UserRole::Admin {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::PermissionDenied,
            "没有删除该评分标准的权限",
        )));
    }

    match storage.count_submissions_by_rubric(rubric_id).await {
        Ok(0) => {}
        Ok(n) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::RubricInUse,
                format!("评分标准正被 {n} 份提交引用，无法删除"),
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("统计评分标准引用失败: {e}"),
                )),
            );
        }
    }

    match storage.delete_rubric(rubric_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty())),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::RubricNotFound,
            "评分标准不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("删除评分标准失败: {e}"),
            )),
        ),
    }
}
