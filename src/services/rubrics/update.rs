use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RubricService;
use crate::models::rubrics::requests::UpdateRubricRequest;
use crate::models::users::entities::{ActorContext, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{assign_criterion_ids, validate_criteria};

/// 更新评分标准
/// PUT /rubrics/{id}
///
/// 仅所有者和管理员可更新。替换 criteria 时重新校验权重并重算总分。
pub async fn update_rubric(
    service: &RubricService,
    request: &HttpRequest,
    actor: ActorContext,
    rubric_id: i64,
    mut update: UpdateRubricRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if update.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::Validation,
            "更新内容不能为空",
        )));
    }

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
            "没有修改该评分标准的权限",
        )));
    }

    if let Some(title) = &update.title
        && title.trim().is_empty()
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::Validation,
            "Title must not be empty",
        )));
    }

    if let Some(criteria) = &mut update.criteria {
        if let Err(msg) = validate_criteria(criteria) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::RubricWeightInvalid, msg)));
        }
        assign_criterion_ids(criteria);
    }

    match storage.update_rubric(rubric_id, update).await {
        Ok(Some(updated)) => Ok(HttpResponse::Ok().json(ApiResponse::success(updated))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::RubricNotFound,
            "评分标准不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("更新评分标准失败: {e}"),
            )),
        ),
    }
}
