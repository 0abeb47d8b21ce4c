use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::extract_actor;
use crate::middlewares::{self, RateLimit};
use crate::models::evaluations::requests::EvaluationListQuery;
use crate::models::submissions::requests::{
    CreateSubmissionRequest, SubmissionListQuery, UpdateSubmissionRequest,
};
use crate::services::{EvaluationService, SubmissionService};

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);
static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);

// 列出提交
pub async fn list_submissions(
    req: HttpRequest,
    query: web::Query<SubmissionListQuery>,
) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    SUBMISSION_SERVICE
        .list_submissions(&req, actor, query.into_inner())
        .await
}

// 创建提交（草稿）
pub async fn create_submission(
    req: HttpRequest,
    body: web::Json<CreateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    SUBMISSION_SERVICE
        .create_submission(&req, actor, body.into_inner())
        .await
}

// 获取提交详情
pub async fn get_submission(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    SUBMISSION_SERVICE
        .get_submission(&req, actor, path.into_inner())
        .await
}

// 更新提交
pub async fn update_submission(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    SUBMISSION_SERVICE
        .update_submission(&req, actor, path.into_inner(), body.into_inner())
        .await
}

// 正式提交
pub async fn submit_submission(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    SUBMISSION_SERVICE
        .submit_submission(&req, actor, path.into_inner())
        .await
}

// 删除提交
pub async fn delete_submission(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    SUBMISSION_SERVICE
        .delete_submission(&req, actor, path.into_inner())
        .await
}

// 获取版本历史
pub async fn list_submission_versions(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    SUBMISSION_SERVICE
        .list_submission_versions(&req, actor, path.into_inner())
        .await
}

// 获取某个提交的评估列表
pub async fn list_submission_evaluations(
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<EvaluationListQuery>,
) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    let mut query = query.into_inner();
    query.submission_id = Some(path.into_inner());
    EVALUATION_SERVICE.list_evaluations(&req, actor, query).await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(RateLimit::api())
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_submissions))
            .route("", web::post().to(create_submission))
            .route("/{id}", web::get().to(get_submission))
            .route("/{id}", web::put().to(update_submission))
            .route("/{id}", web::delete().to(delete_submission))
            .route("/{id}/submit", web::post().to(submit_submission))
            .route("/{id}/versions", web::get().to(list_submission_versions))
            .route("/{id}/evaluations", web::get().to(list_submission_evaluations)),
    );
}
