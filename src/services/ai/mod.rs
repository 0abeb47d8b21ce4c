pub mod evaluate;
pub mod quick_feedback;
pub mod status;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::engine::TextGeneration;
use crate::models::ai::requests::QuickFeedbackRequest;
use crate::models::users::entities::ActorContext;
use crate::storage::Storage;

pub struct AiService {
    storage: Option<Arc<dyn Storage>>,
}

impl AiService {
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

    pub(crate) fn get_engine(&self, request: &HttpRequest) -> Arc<dyn TextGeneration> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn TextGeneration>>>()
            .expect("Engine not found in app data")
            .get_ref()
            .clone()
    }

    /// 受理一次自动评估，后台异步执行
    pub async fn evaluate(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        evaluate::evaluate(self, request, actor, submission_id).await
    }

    /// 查询自动评估进度
    pub async fn evaluation_status(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        evaluation_id: i64,
    ) -> ActixResult<HttpResponse> {
        status::evaluation_status(self, request, actor, evaluation_id).await
    }

    /// 对任意文本生成快速反馈（同步，不落库）
    pub async fn quick_feedback(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        req: QuickFeedbackRequest,
    ) -> ActixResult<HttpResponse> {
        quick_feedback::quick_feedback(self, request, actor, req).await
    }
}
