use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{error, info};

use super::AiService;
use crate::engine::{TextGeneration, analyzer, scoring};
use crate::models::ai::responses::AiEvaluateResponse;
use crate::models::evaluations::entities::{Evaluation, EvaluationStatus, EvaluatorType};
use crate::models::evaluations::requests::{EvaluationPatch, NewEvaluation};
use crate::models::submissions::entities::SubmissionStatus;
use crate::models::users::entities::ActorContext;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 受理一次自动评估
/// POST /ai/evaluate/{submission_id}
///
/// 校验通过后立即返回 202，生成在后台进行。引擎整体失败时评估仍然以兜底
/// 反馈完成（保持可见的终态），提交状态回退到 submitted 供人工重试。
pub async fn evaluate(
    service: &AiService,
    request: &HttpRequest,
    actor: ActorContext,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let engine = service.get_engine(request);

    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(sub)) => sub,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "提交不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交失败: {e}"),
                )),
            );
        }
    };

    if submission.student_id != actor.id && !actor.role.is_staff() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::PermissionDenied,
            "没有对该提交发起自动评估的权限",
        )));
    }

    if !submission.status.can_be_evaluated() {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::InvalidStateTransition,
            format!("{} 状态下的提交不能被评估", submission.status),
        )));
    }

    match storage
        .find_active_evaluation(submission.id, EvaluatorType::Ai)
        .await
    {
        Ok(Some(active)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::EvaluationInFlight,
                format!("该提交已有未完成的自动评估 (id={})", active.id),
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询进行中的评估失败: {e}"),
                )),
            );
        }
    }

    // 评分标准取提交上挂接的那一个
    let rubric_id = submission.rubric_id;
    let rubric_context = match rubric_id {
        Some(rid) => match storage.get_rubric_by_id(rid).await {
            Ok(Some(rubric)) => Some(rubric.criteria_context()),
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
        },
        None => None,
    };

    // 引擎调用在受理后立刻开始，评估直接以 in_progress 落库
    let new_evaluation = NewEvaluation {
        submission_id: submission.id,
        submission_version: submission.current_version,
        rubric_id,
        evaluator_id: actor.id,
        evaluator_type: EvaluatorType::Ai,
        status: EvaluationStatus::InProgress,
    };

    let evaluation = match storage.create_evaluation(new_evaluation).await {
        Ok(evaluation) => evaluation,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("创建评估失败: {e}"),
                )),
            );
        }
    };

    if submission.status == SubmissionStatus::Submitted
        && let Err(e) = storage
            .set_submission_status(submission.id, SubmissionStatus::UnderReview)
            .await
    {
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("更新提交状态失败: {e}"),
            )),
        );
    }

    let response = AiEvaluateResponse {
        evaluation_id: evaluation.id,
        status: evaluation.status,
    };

    let content = submission.content.clone();
    tokio::spawn(run_ai_evaluation(
        storage,
        engine,
        evaluation,
        content,
        rubric_context,
    ));

    Ok(HttpResponse::Accepted().json(ApiResponse::success(response)))
}

/// 后台执行生成与评分
async fn run_ai_evaluation(
    storage: Arc<dyn Storage>,
    engine: Arc<dyn TextGeneration>,
    evaluation: Evaluation,
    content: String,
    rubric_context: Option<String>,
) {
    match analyzer::analyze(engine.as_ref(), &content, rubric_context.as_deref()).await {
        Ok(output) => {
            // 分数来自确定性启发式，与引擎输出无关，按百分制记录
            let score = scoring::heuristic_score(&content);

            let patch = EvaluationPatch {
                status: Some(EvaluationStatus::Completed),
                total_score: Some(score),
                max_score: Some(100.0),
                percentage: Some(score),
                grammar_feedback: Some(output.grammar_feedback),
                clarity_feedback: Some(output.clarity_feedback),
                structure_feedback: Some(output.structure_feedback),
                content_feedback: Some(output.content_feedback),
                overall_feedback: Some(output.overall_feedback),
                suggestions: Some(output.suggestions),
                completed_at: Some(chrono::Utc::now()),
                ..Default::default()
            };

            if let Err(e) = storage.update_evaluation(evaluation.id, patch).await {
                error!(
                    evaluation_id = evaluation.id,
                    "Failed to persist evaluation results: {e}"
                );
                complete_with_fallback(&storage, &evaluation).await;
                return;
            }

            if let Err(e) = storage
                .set_submission_status(evaluation.submission_id, SubmissionStatus::Evaluated)
                .await
            {
                error!(
                    submission_id = evaluation.submission_id,
                    "Failed to advance submission to evaluated: {e}"
                );
            }

            info!(
                evaluation_id = evaluation.id,
                score, "Automatic evaluation completed"
            );
        }
        Err(e) => {
            error!(
                evaluation_id = evaluation.id,
                "Automatic evaluation failed: {e}"
            );
            complete_with_fallback(&storage, &evaluation).await;
        }
    }
}

/// 引擎兜底路径
///
/// 评估以固定的兜底反馈进入 completed 终态（不留下卡在 in_progress 的记录，
/// 也不产生分数），提交回退到 submitted 供人工重新发起。
async fn complete_with_fallback(storage: &Arc<dyn Storage>, evaluation: &Evaluation) {
    let patch = EvaluationPatch {
        status: Some(EvaluationStatus::Completed),
        overall_feedback: Some(analyzer::FALLBACK_OVERALL.to_string()),
        suggestions: Some(vec![analyzer::FALLBACK_SUGGESTION.to_string()]),
        completed_at: Some(chrono::Utc::now()),
        ..Default::default()
    };

    if let Err(e) = storage.update_evaluation(evaluation.id, patch).await {
        error!(
            evaluation_id = evaluation.id,
            "Failed to finalize fallback evaluation: {e}"
        );
    }

    if let Err(e) = storage
        .set_submission_status(evaluation.submission_id, SubmissionStatus::Submitted)
        .await
    {
        error!(
            submission_id = evaluation.submission_id,
            "Failed to revert submission status: {e}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::errors::EvalHubError;
    use crate::models::submissions::entities::Submission;
    use crate::models::submissions::requests::CreateSubmissionRequest;
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::UpsertUserFromClaims;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    /// 所有生成调用都失败的测试引擎
    struct DeadEngine;

    #[async_trait]
    impl TextGeneration for DeadEngine {
        async fn generate(&self, _system: &str, _prompt: &str) -> crate::errors::Result<String> {
            Err(EvalHubError::engine_failure("engine unreachable"))
        }
    }

    /// 总是成功返回的测试引擎
    struct CannedEngine;

    #[async_trait]
    impl TextGeneration for CannedEngine {
        async fn generate(&self, _system: &str, _prompt: &str) -> crate::errors::Result<String> {
            Ok("Looks fine.".to_string())
        }
    }

    async fn storage_with_submission() -> (Arc<dyn Storage>, Submission) {
        let storage: Arc<dyn Storage> = Arc::new(
            SeaOrmStorage::new_with_url(":memory:", 1, 5)
                .await
                .expect("in-memory storage"),
        );

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
                    content: "word ".repeat(120).trim_end().to_string(),
                    rubric_id: None,
                    attachment: None,
                },
            )
            .await
            .expect("create submission");

        storage
            .set_submission_status(submission.id, SubmissionStatus::UnderReview)
            .await
            .expect("set under_review");

        (storage, submission)
    }

    async fn seed_in_progress_evaluation(
        storage: &Arc<dyn Storage>,
        submission: &Submission,
    ) -> Evaluation {
        storage
            .create_evaluation(NewEvaluation {
                submission_id: submission.id,
                submission_version: submission.current_version,
                rubric_id: None,
                evaluator_id: submission.student_id,
                evaluator_type: EvaluatorType::Ai,
                status: EvaluationStatus::InProgress,
            })
            .await
            .expect("create evaluation")
    }

    #[tokio::test]
    async fn test_engine_failure_completes_with_fallback_and_reverts_submission() {
        let (storage, submission) = storage_with_submission().await;
        let evaluation = seed_in_progress_evaluation(&storage, &submission).await;

        run_ai_evaluation(
            storage.clone(),
            Arc::new(DeadEngine),
            evaluation.clone(),
            submission.content.clone(),
            None,
        )
        .await;

        let finished = storage
            .get_evaluation_by_id(evaluation.id)
            .await
            .expect("get evaluation")
            .expect("evaluation exists");
        assert_eq!(finished.status, EvaluationStatus::Completed);
        assert_eq!(
            finished.overall_feedback.as_deref(),
            Some(analyzer::FALLBACK_OVERALL)
        );
        assert_eq!(
            finished.suggestions,
            vec![analyzer::FALLBACK_SUGGESTION.to_string()]
        );
        assert!(finished.total_score.is_none());
        assert!(finished.completed_at.is_some());

        let reverted = storage
            .get_submission_by_id(submission.id)
            .await
            .expect("get submission")
            .expect("submission exists");
        assert_eq!(reverted.status, SubmissionStatus::Submitted);
    }

    #[tokio::test]
    async fn test_successful_run_scores_and_advances_submission() {
        let (storage, submission) = storage_with_submission().await;
        let evaluation = seed_in_progress_evaluation(&storage, &submission).await;

        run_ai_evaluation(
            storage.clone(),
            Arc::new(CannedEngine),
            evaluation.clone(),
            submission.content.clone(),
            None,
        )
        .await;

        let finished = storage
            .get_evaluation_by_id(evaluation.id)
            .await
            .expect("get evaluation")
            .expect("evaluation exists");
        assert_eq!(finished.status, EvaluationStatus::Completed);
        assert_eq!(
            finished.total_score,
            Some(scoring::heuristic_score(&submission.content))
        );
        assert_eq!(finished.max_score, Some(100.0));
        assert_eq!(finished.overall_feedback.as_deref(), Some("Looks fine."));

        let advanced = storage
            .get_submission_by_id(submission.id)
            .await
            .expect("get submission")
            .expect("submission exists");
        assert_eq!(advanced.status, SubmissionStatus::Evaluated);
    }
}
