use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RubricService;
use crate::models::rubrics::requests::RubricListQuery;
use crate::models::users::entities::ActorContext;
use crate::models::{ApiResponse, ErrorCode};

/// 列出评分标准（分页）
/// GET /rubrics
///
/// 学生只能看到公开的标准和自己创建的标准，教师和管理员不受限制。
pub async fn list_rubrics(
    service: &RubricService,
    request: &HttpRequest,
    actor: ActorContext,
    query: RubricListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let visible_to = if actor.role.is_staff() {
        None
    } else {
        Some(actor.id)
    };

    match storage.list_rubrics_with_pagination(query, visible_to).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success_paginated(
            response.items,
            response.pagination,
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询评分标准列表失败: {e}"),
            )),
        ),
    }
}
