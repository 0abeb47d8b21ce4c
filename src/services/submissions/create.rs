use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::users::entities::ActorContext;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_submission_payload;

/// 创建提交
/// POST /submissions
pub async fn create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    actor: ActorContext,
    req: crate::models::submissions::requests::CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(msg) = validate_submission_payload(&req.title, &req.content) {
        return Ok(
            HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::Validation, msg))
        );
    }

    // 评分标准引用必须真实存在
    if let Some(rubric_id) = req.rubric_id {
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

    match storage.create_submission(actor.id, req).await {
        Ok(submission) => Ok(HttpResponse::Created().json(ApiResponse::success(submission))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("创建提交失败: {e}"),
            )),
        ),
    }
}
