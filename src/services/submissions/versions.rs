use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use super::detail::check_read_permission;
use crate::models::submissions::responses::SubmissionVersionListResponse;
use crate::models::users::entities::ActorContext;
use crate::models::{ApiResponse, ErrorCode};

/// 获取提交的版本历史（版本号倒序）
/// GET /submissions/{id}/versions
pub async fn list_submission_versions(
    service: &SubmissionService,
    request: &HttpRequest,
    actor: ActorContext,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let submission = match storage.get_submission_by_id(submission_id).await {
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

    if let Err(resp) = check_read_permission(&actor, &submission) {
        return Ok(resp);
    }

    match storage.list_submission_versions(submission_id).await {
        Ok(items) => Ok(
            HttpResponse::Ok().json(ApiResponse::success(SubmissionVersionListResponse { items }))
        ),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询版本历史失败: {e}"),
            )),
        ),
    }
}
