use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::submissions::entities::SubmissionStatus;
use crate::models::users::entities::ActorContext;
use crate::models::{ApiResponse, ErrorCode};

/// 删除提交
/// DELETE /submissions/{id}
///
/// 学生只能删除草稿状态的本人提交；教师和管理员不受状态限制。
/// 版本快照随提交一起删除，评估记录保留。
pub async fn delete_submission(
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

    if !actor.role.is_staff() {
        if submission.student_id != actor.id {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::PermissionDenied,
                "没有删除该提交的权限",
            )));
        }
        if submission.status != SubmissionStatus::Draft {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::InvalidStateTransition,
                format!("{} 状态下不允许删除", submission.status),
            )));
        }
    }

    match storage.delete_submission(submission_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty())),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "提交不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("删除提交失败: {e}"),
            )),
        ),
    }
}
