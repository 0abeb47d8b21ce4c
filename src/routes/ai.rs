use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::extract_actor;
use crate::middlewares::{self, RateLimit};
use crate::models::ai::requests::QuickFeedbackRequest;
use crate::services::AiService;

// 懒加载的全局 AiService 实例
static AI_SERVICE: Lazy<AiService> = Lazy::new(AiService::new_lazy);

// 受理自动评估
pub async fn evaluate(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    AI_SERVICE.evaluate(&req, actor, path.into_inner()).await
}

// 查询自动评估进度
pub async fn evaluation_status(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    AI_SERVICE
        .evaluation_status(&req, actor, path.into_inner())
        .await
}

// 快速反馈
pub async fn quick_feedback(
    req: HttpRequest,
    body: web::Json<QuickFeedbackRequest>,
) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    AI_SERVICE
        .quick_feedback(&req, actor, body.into_inner())
        .await
}

// 配置路由
pub fn configure_ai_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/ai")
            .wrap(middlewares::RequireJWT)
            .service(
                // 每次受理都会触发一轮引擎调用，限制最严
                web::resource("/evaluate/{submission_id}")
                    .wrap(RateLimit::ai_evaluate())
                    .route(web::post().to(evaluate)),
            )
            .service(
                web::resource("/evaluations/{id}/status")
                    .wrap(RateLimit::api())
                    .route(web::get().to(evaluation_status)),
            )
            .service(
                web::resource("/quick-feedback")
                    .wrap(RateLimit::quick_feedback())
                    .route(web::post().to(quick_feedback)),
            ),
    );
}
