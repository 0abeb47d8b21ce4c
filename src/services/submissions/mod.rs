pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod submit;
pub mod update;
pub mod versions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::requests::{
    CreateSubmissionRequest, SubmissionListQuery, UpdateSubmissionRequest,
};
use crate::models::users::entities::ActorContext;
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
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

    /// 创建提交（草稿）
    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        req: CreateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_submission(self, request, actor, req).await
    }

    /// 获取提交详情
    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_submission(self, request, actor, submission_id).await
    }

    /// 列出提交
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        query: SubmissionListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, actor, query).await
    }

    /// 更新提交
    pub async fn update_submission(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        submission_id: i64,
        update: UpdateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_submission(self, request, actor, submission_id, update).await
    }

    /// 提交（draft/returned -> submitted）
    pub async fn submit_submission(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        submit::submit_submission(self, request, actor, submission_id).await
    }

    /// 删除提交
    pub async fn delete_submission(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_submission(self, request, actor, submission_id).await
    }

    /// 获取提交的版本历史
    pub async fn list_submission_versions(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        versions::list_submission_versions(self, request, actor, submission_id).await
    }
}
