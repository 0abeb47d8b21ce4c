use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::extract_actor;
use crate::middlewares::{self, RateLimit, RequireRole};
use crate::models::rubrics::requests::{CreateRubricRequest, RubricListQuery, UpdateRubricRequest};
use crate::models::users::entities::UserRole;
use crate::services::RubricService;

// 懒加载的全局 RubricService 实例
static RUBRIC_SERVICE: Lazy<RubricService> = Lazy::new(RubricService::new_lazy);

// 列出评分标准
pub async fn list_rubrics(
    req: HttpRequest,
    query: web::Query<RubricListQuery>,
) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    RUBRIC_SERVICE
        .list_rubrics(&req, actor, query.into_inner())
        .await
}

// 列出我创建的评分标准
pub async fn list_my_rubrics(
    req: HttpRequest,
    query: web::Query<RubricListQuery>,
) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    let mut query = query.into_inner();
    query.owner_id = Some(actor.id);
    RUBRIC_SERVICE.list_rubrics(&req, actor, query).await
}

// 获取评分标准详情
pub async fn get_rubric(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    RUBRIC_SERVICE.get_rubric(&req, actor, path.into_inner()).await
}

// 创建评分标准
pub async fn create_rubric(
    req: HttpRequest,
    body: web::Json<CreateRubricRequest>,
) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    RUBRIC_SERVICE
        .create_rubric(&req, actor, body.into_inner())
        .await
}

// 更新评分标准
pub async fn update_rubric(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateRubricRequest>,
) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    RUBRIC_SERVICE
        .update_rubric(&req, actor, path.into_inner(), body.into_inner())
        .await
}

// 删除评分标准
pub async fn delete_rubric(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    let actor = match extract_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    RUBRIC_SERVICE
        .delete_rubric(&req, actor, path.into_inner())
        .await
}

// 配置路由
pub fn configure_rubrics_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/rubrics")
            .wrap(RateLimit::api())
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列出评分标准 - 所有登录用户可访问（业务层按可见性过滤）
                    .route(web::get().to(list_rubrics))
                    // 创建评分标准 - 仅教师和管理员
                    .route(
                        web::post()
                            .to(create_rubric)
                            .wrap(RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                // 我创建的评分标准 - 仅教师和管理员
                web::resource("/my").route(
                    web::get()
                        .to(list_my_rubrics)
                        .wrap(RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/{id}")
                    // 获取详情 - 可见性在业务层检查
                    .route(web::get().to(get_rubric))
                    // 更新 - 所有者或管理员，角色先粗筛
                    .route(
                        web::put()
                            .to(update_rubric)
                            .wrap(RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    // 删除 - 所有者或管理员
                    .route(
                        web::delete()
                            .to(delete_rubric)
                            .wrap(RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            ),
    );
}
