pub mod complete;
pub mod create;
pub mod detail;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::evaluations::requests::{
    CompleteEvaluationRequest, CreateEvaluationRequest, EvaluationListQuery,
    UpdateEvaluationRequest,
};
use crate::models::users::entities::ActorContext;
use crate::storage::Storage;

pub struct EvaluationService {
    storage: Option<Arc<dyn Storage>>,
}

impl EvaluationService {
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

    /// 发起一次教师评估
    pub async fn create_evaluation(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        req: CreateEvaluationRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_evaluation(self, request, actor, req).await
    }

    /// 获取评估详情
    pub async fn get_evaluation(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        evaluation_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_evaluation(self, request, actor, evaluation_id).await
    }

    /// 列出评估
    pub async fn list_evaluations(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        query: EvaluationListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_evaluations(self, request, actor, query).await
    }

    /// 更新进行中的评估
    pub async fn update_evaluation(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        evaluation_id: i64,
        update: UpdateEvaluationRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_evaluation(self, request, actor, evaluation_id, update).await
    }

    /// 完成评估并写回提交状态
    pub async fn complete_evaluation(
        &self,
        request: &HttpRequest,
        actor: ActorContext,
        evaluation_id: i64,
        req: CompleteEvaluationRequest,
    ) -> ActixResult<HttpResponse> {
        complete::complete_evaluation(self, request, actor, evaluation_id, req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test::TestRequest, web};

    use crate::models::evaluations::entities::{Evaluation, EvaluationStatus, EvaluatorType};
    use crate::models::evaluations::requests::{EvaluationPatch, NewEvaluation};
    use crate::models::submissions::requests::CreateSubmissionRequest;
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::UpsertUserFromClaims;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn memory_storage() -> Arc<dyn Storage> {
        Arc::new(
            SeaOrmStorage::new_with_url(":memory:", 1, 5)
                .await
                .expect("in-memory storage"),
        )
    }

    async fn seed_teacher(storage: &Arc<dyn Storage>) -> ActorContext {
        let teacher = storage
            .upsert_user_from_claims(UpsertUserFromClaims {
                external_uid: "idp|teacher-1".to_string(),
                email: "carol@example.com".to_string(),
                display_name: Some("Carol".to_string()),
                role: UserRole::Teacher,
            })
            .await
            .expect("seed teacher");
        ActorContext {
            id: teacher.id,
            role: teacher.role,
        }
    }

    async fn seed_completed_evaluation(
        storage: &Arc<dyn Storage>,
        evaluator_id: i64,
    ) -> Evaluation {
        let student = storage
            .upsert_user_from_claims(UpsertUserFromClaims {
                external_uid: "idp|student-1".to_string(),
                email: "alice@example.com".to_string(),
                display_name: Some("Alice".to_string()),
                role: UserRole::Student,
            })
            .await
            .expect("seed student");

        let submission = storage
            .create_submission(
                student.id,
                CreateSubmissionRequest {
                    title: "Essay".to_string(),
                    description: None,
                    content: "Draft text.".to_string(),
                    rubric_id: None,
                    attachment: None,
                },
            )
            .await
            .expect("create submission");

        let evaluation = storage
            .create_evaluation(NewEvaluation {
                submission_id: submission.id,
                submission_version: submission.current_version,
                rubric_id: None,
                evaluator_id,
                evaluator_type: EvaluatorType::Teacher,
                status: EvaluationStatus::Pending,
            })
            .await
            .expect("create evaluation");

        storage
            .update_evaluation(
                evaluation.id,
                EvaluationPatch {
                    status: Some(EvaluationStatus::Completed),
                    overall_feedback: Some("Done.".to_string()),
                    completed_at: Some(chrono::Utc::now()),
                    ..Default::default()
                },
            )
            .await
            .expect("complete evaluation")
            .expect("evaluation exists")
    }

    #[tokio::test]
    async fn test_update_rejects_completed_evaluation() {
        let storage = memory_storage().await;
        let actor = seed_teacher(&storage).await;
        let evaluation = seed_completed_evaluation(&storage, actor.id).await;

        let request = TestRequest::default()
            .app_data(web::Data::new(storage.clone()))
            .to_http_request();
        let service = EvaluationService::new_lazy();

        let resp = service
            .update_evaluation(
                &request,
                actor,
                evaluation.id,
                UpdateEvaluationRequest {
                    overall_feedback: Some("Rewritten.".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("handler result");
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        // 记录原样保留
        let kept = storage
            .get_evaluation_by_id(evaluation.id)
            .await
            .expect("get evaluation")
            .expect("evaluation exists");
        assert_eq!(kept.overall_feedback.as_deref(), Some("Done."));
    }

    #[tokio::test]
    async fn test_complete_rejects_completed_evaluation() {
        let storage = memory_storage().await;
        let actor = seed_teacher(&storage).await;
        let evaluation = seed_completed_evaluation(&storage, actor.id).await;

        let request = TestRequest::default()
            .app_data(web::Data::new(storage.clone()))
            .to_http_request();
        let service = EvaluationService::new_lazy();

        let resp = service
            .complete_evaluation(
                &request,
                actor,
                evaluation.id,
                CompleteEvaluationRequest {
                    criteria_scores: None,
                    overall_feedback: Some("Again.".to_string()),
                    structure_feedback: None,
                    content_feedback: None,
                },
            )
            .await
            .expect("handler result");
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
