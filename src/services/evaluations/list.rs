use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::evaluations::requests::EvaluationListQuery;
use crate::models::users::entities::ActorContext;
use crate::models::{ApiResponse, ErrorCode};

/// 列出评估（分页）
/// GET /evaluations
///
/// 学生只能看到自己提交上的评估；教职人员可以任意查询。
pub async fn list_evaluations(
    service: &EvaluationService,
    request: &HttpRequest,
    actor: ActorContext,
    query: EvaluationListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let visible_to = if actor.role.is_staff() {
        None
    } else {
        Some(actor.id)
    };

    // 学生显式指定他人的提交时返回 403
    if !actor.role.is_staff() && let Some(submission_id) = query.submission_id {
        match storage.get_submission_by_id(submission_id).await {
            Ok(Some(submission)) if submission.student_id == actor.id => {}
            Ok(_) => {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::PermissionDenied,
                    "只能查看自己提交的评估",
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
        }
    }

    match storage
        .list_evaluations_with_pagination(query, visible_to)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success_paginated(
            response.items,
            response.pagination,
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询评估列表失败: {e}"),
            )),
        ),
    }
}
