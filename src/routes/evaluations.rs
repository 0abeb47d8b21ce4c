use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::extract_actor;
use crate::middlewares::{self, RateLimit, RequireRole};
use crate::models::evaluations::requests::{
    CompleteEvaluationRequest, CreateEvaluationRequest, EvaluationListQuery,
    UpdateEvaluationRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::EvaluationService;

// 懒加载的全局 EvaluationService 实例
static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);

// 列出评估
pub async fn list_evaluations(
    req: HttpRequest,
    query: web::Query<EvaluationListQuery>,
) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    EVALUATION_SERVICE
        .list_evaluations(&req, actor, query.into_inner())
        .await
}

// 发起教师评估
pub async fn create_evaluation(
    req: HttpRequest,
    body: web::Json<CreateEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    EVALUATION_SERVICE
        .create_evaluation(&req, actor, body.into_inner())
        .await
}

// 获取评估详情
pub async fn get_evaluation(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    EVALUATION_SERVICE
        .get_evaluation(&req, actor, path.into_inner())
        .await
}

// 更新进行中的评估
pub async fn update_evaluation(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    EVALUATION_SERVICE
        .update_evaluation(&req, actor, path.into_inner(), body.into_inner())
        .await
}

// 完成评估
pub async fn complete_evaluation(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<CompleteEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    EVALUATION_SERVICE
        .complete_evaluation(&req, actor, path.into_inner(), body.into_inner())
        .await
}

// 配置路由
pub fn configure_evaluations_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations")
            .wrap(RateLimit::api())
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列出评估 - 所有登录用户可访问（学生被限制在自己的提交）
                    .route(web::get().to(list_evaluations))
                    // 发起教师评估 - 仅教师和管理员
                    .route(
                        web::post()
                            .to(create_evaluation)
                            .wrap(RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(web::resource("/{id}").route(web::get().to(get_evaluation)).route(
                web::put()
                    .to(update_evaluation)
                    .wrap(RequireRole::new_any(UserRole::teacher_roles())),
            ))
            .service(
                web::resource("/{id}/complete").route(
                    web::post()
                        .to(complete_evaluation)
                        .wrap(RequireRole::new_any(UserRole::teacher_roles())),
                ),
            ),
    );
}
