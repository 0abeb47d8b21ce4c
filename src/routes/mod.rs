pub mod ai;

pub mod evaluations;

pub mod rubrics;

pub mod submissions;

pub use ai::configure_ai_routes;
pub use evaluations::configure_evaluations_routes;
pub use rubrics::configure_rubrics_routes;
pub use submissions::configure_submissions_routes;

use actix_web::{HttpRequest, HttpResponse};

use crate::middlewares::RequireJWT;
use crate::models::users::entities::ActorContext;
use crate::models::{ApiResponse, ErrorCode};

/// 从请求扩展中取出执行者上下文，缺失时返回 401
pub(crate) fn extract_actor(req: &HttpRequest) -> Result<ActorContext, HttpResponse> {
    match RequireJWT::extract_user_claims(req) {
        Some(user) => Ok(ActorContext::from(&user)),
        None => Err(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "无法获取用户信息",
        ))),
    }
}
