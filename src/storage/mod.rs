use std::sync::Arc;

use crate::models::{
    evaluations::{
        entities::{Evaluation, EvaluatorType},
        requests::{EvaluationListQuery, EvaluationPatch, NewEvaluation},
        responses::EvaluationListResponse,
    },
    rubrics::{
        entities::Rubric,
        requests::{CreateRubricRequest, RubricListQuery, UpdateRubricRequest},
        responses::RubricListResponse,
    },
    submissions::{
        entities::{Submission, SubmissionStatus, SubmissionVersion},
        requests::{CreateSubmissionRequest, SubmissionListQuery, UpdateSubmissionRequest},
        responses::SubmissionListResponse,
    },
    users::{entities::User, requests::UpsertUserFromClaims},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过 IdP 标识获取用户信息
    async fn get_user_by_uid(&self, external_uid: &str) -> Result<Option<User>>;
    // 按 IdP 令牌声明创建或更新本地用户
    async fn upsert_user_from_claims(&self, claims: UpsertUserFromClaims) -> Result<User>;

    /// 提交管理方法
    // 创建提交（同一事务写入版本 1 快照）
    async fn create_submission(
        &self,
        student_id: i64,
        submission: CreateSubmissionRequest,
    ) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 列出提交
    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse>;
    // 更新提交；内容变化时在同一事务内递增版本并追加快照
    async fn update_submission(
        &self,
        id: i64,
        editor_id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>>;
    // 仅变更提交状态
    async fn set_submission_status(&self, id: i64, status: SubmissionStatus) -> Result<bool>;
    // 删除提交及其全部版本快照（评估记录保留）
    async fn delete_submission(&self, id: i64) -> Result<bool>;
    // 列出提交的版本历史（版本号倒序）
    async fn list_submission_versions(&self, submission_id: i64) -> Result<Vec<SubmissionVersion>>;
    // 获取指定版本快照
    async fn get_submission_version(
        &self,
        submission_id: i64,
        version: i32,
    ) -> Result<Option<SubmissionVersion>>;
    // 统计引用某评分标准的提交数
    async fn count_submissions_by_rubric(&self, rubric_id: i64) -> Result<u64>;

    /// 评分标准管理方法
    // 创建评分标准
    async fn create_rubric(&self, owner_id: i64, rubric: CreateRubricRequest) -> Result<Rubric>;
    // 通过ID获取评分标准
    async fn get_rubric_by_id(&self, id: i64) -> Result<Option<Rubric>>;
    // 列出评分标准；visible_to 非空时限定为公开的或该用户拥有的
    async fn list_rubrics_with_pagination(
        &self,
        query: RubricListQuery,
        visible_to: Option<i64>,
    ) -> Result<RubricListResponse>;
    // 更新评分标准
    async fn update_rubric(&self, id: i64, update: UpdateRubricRequest) -> Result<Option<Rubric>>;
    // 删除评分标准
    async fn delete_rubric(&self, id: i64) -> Result<bool>;

    /// 评估管理方法
    // 创建评估
    async fn create_evaluation(&self, evaluation: NewEvaluation) -> Result<Evaluation>;
    // 通过ID获取评估
    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>>;
    // 查找提交上同一执行方类型的未完成评估（single-flight 检查）
    async fn find_active_evaluation(
        &self,
        submission_id: i64,
        evaluator_type: EvaluatorType,
    ) -> Result<Option<Evaluation>>;
    // 按补丁更新评估（评估是只增不删的审计记录，没有删除操作）
    async fn update_evaluation(&self, id: i64, patch: EvaluationPatch)
    -> Result<Option<Evaluation>>;
    // 列出评估；visible_to 非空时限定为该用户自己提交上的评估
    async fn list_evaluations_with_pagination(
        &self,
        query: EvaluationListQuery,
        visible_to: Option<i64>,
    ) -> Result<EvaluationListResponse>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
