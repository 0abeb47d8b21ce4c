use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::submissions::requests::UpdateSubmissionRequest;
use crate::models::users::entities::ActorContext;
use crate::models::{ApiResponse, ErrorCode};

/// 校验本次更新请求的状态迁移
///
/// 通过通用更新接口允许的迁移：
/// - 本人：draft/returned -> submitted（等价于 submit 操作）
/// - 教师/管理员：evaluated -> returned（退回重做）
fn check_status_transition(
    actor: &ActorContext,
    submission: &Submission,
    target: &SubmissionStatus,
) -> Result<(), HttpResponse> {
    match target {
        SubmissionStatus::Submitted => {
            if submission.student_id != actor.id {
                return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::PermissionDenied,
                    "只有提交者本人可以提交",
                )));
            }
            if !submission.status.can_submit() {
                return Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::InvalidStateTransition,
                    format!("无法从 {} 状态提交", submission.status),
                )));
            }
            Ok(())
        }
        SubmissionStatus::Returned => {
            if !actor.role.is_staff() {
                return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::PermissionDenied,
                    "只有教师或管理员可以退回提交",
                )));
            }
            if submission.status != SubmissionStatus::Evaluated {
                return Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::InvalidStateTransition,
                    format!("无法从 {} 状态退回", submission.status),
                )));
            }
            Ok(())
        }
        other => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::InvalidStateTransition,
            format!("不允许直接将提交置为 {other} 状态"),
        ))),
    }
}

/// 更新提交
/// PUT /submissions/{id}
pub async fn update_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    actor: ActorContext,
    submission_id: i64,
    update: UpdateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if update.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::Validation,
            "更新请求不能为空",
        )));
    }

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

    // 内容类修改：学生仅本人、仅可编辑状态；教师和管理员不受限制
    let edits_content = update.title.is_some()
        || update.description.is_some()
        || update.content.is_some()
        || update.rubric_id.is_some()
        || update.attachment.is_some();

    if edits_content && !actor.role.is_staff() {
        if submission.student_id != actor.id {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::PermissionDenied,
                "只有提交者本人可以编辑内容",
            )));
        }
        if !submission.status.is_editable() {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::InvalidStateTransition,
                format!("{} 状态下不允许编辑内容", submission.status),
            )));
        }
    }

    if let Some(ref target) = update.status {
        if let Err(resp) = check_status_transition(&actor, &submission, target) {
            return Ok(resp);
        }
    }

    // 评分标准引用必须真实存在
    if let Some(rubric_id) = update.rubric_id {
        match storage.get_rubric_by_id(rubric_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::Validation,
                    "Referenced rubric does not exist",
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
        }
    }

    match storage
        .update_submission(submission_id, actor.id, update)
        .await
    {
        Ok(Some(updated)) => Ok(HttpResponse::Ok().json(ApiResponse::success(updated))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "提交不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("更新提交失败: {e}"),
            )),
        ),
    }
}
