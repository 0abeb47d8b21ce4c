use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::ActorContext;
use crate::models::{ApiResponse, ErrorCode};

/// 检查执行者是否可以查看该提交（本人或教师/管理员）
pub(crate) fn check_read_permission(
    actor: &ActorContext,
    submission: &Submission,
) -> Result<(), HttpResponse> {
    if submission.student_id == actor.id || actor.role.is_staff() {
        return Ok(());
    }
    Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::PermissionDenied,
        "没有查看该提交的权限",
    )))
}

/// 获取提交详情
/// GET /submissions/{id}
pub async fn get_submission(
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

    Ok(HttpResponse::Ok().json(ApiResponse::success(submission)))
}
