pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::rubrics::requests::{CreateRubricRequest, RubricListQuery, UpdateRubricRequest};
use crate::models::users::entities::ActorContext;
use crate::storage::Storage;

pub struct RubricService {
    storage: Option<Arc<dyn Storage>>,
}

impl RubricService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 创建评分标准
    pub async fn create_rubric(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        req: CreateRubricRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_rubric(self, request, actor, req).await
    }

    /// 获取评分标准详情
    pub async fn get_rubric(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        rubric_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_rubric(self, request, actor, rubric_id).await
    }

    /// 列出评分标准
    pub async fn list_rubrics(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        query: RubricListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_rubrics(self, request, actor, query).await
    }

    /// 更新评分标准
    pub async fn update_rubric(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        rubric_id: i64,
        update: UpdateRubricRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_rubric(self, request, actor, rubric_id, update).await
    }

    /// 删除评分标准
    pub async fn delete_rubric(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        rubric_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_rubric(self, request, actor, rubric_id).await
    }
}
