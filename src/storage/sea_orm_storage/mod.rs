//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod evaluations;
mod rubrics;
mod submissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{EvalHubError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::new_with_url(&config.database.url, config.database.pool_size, config.database.timeout)
            .await
    }

    /// 按给定连接串创建存储实例（测试也走这里）
    pub async fn new_with_url(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EvalHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| EvalHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| EvalHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EvalHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_uid(&self, external_uid: &str) -> Result<Option<User>> {
        self.get_user_by_uid_impl(external_uid).await
    }

    async fn upsert_user_from_claims(&self, claims: UpsertUserFromClaims) -> Result<User> {
        self.upsert_user_from_claims_impl(claims).await
    }

    // 提交模块
    async fn create_submission(
        &self,
        student_id: i64,
        submission: CreateSubmissionRequest,
    ) -> Result<Submission> {
        self.create_submission_impl(student_id, submission).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        self.list_submissions_with_pagination_impl(query).await
    }

    async fn update_submission(
        &self,
        id: i64,
        editor_id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>> {
        self.update_submission_impl(id, editor_id, update).await
    }

    async fn set_submission_status(&self, id: i64, status: SubmissionStatus) -> Result<bool> {
        self.set_submission_status_impl(id, status).await
    }

    async fn delete_submission(&self, id: i64) -> Result<bool> {
        self.delete_submission_impl(id).await
    }

    async fn list_submission_versions(
        &self,
        submission_id: i64,
    ) -> Result<Vec<SubmissionVersion>> {
        self.list_submission_versions_impl(submission_id).await
    }

    async fn get_submission_version(
        &self,
        submission_id: i64,
        version: i32,
    ) -> Result<Option<SubmissionVersion>> {
        self.get_submission_version_impl(submission_id, version)
            .await
    }

    async fn count_submissions_by_rubric(&self, rubric_id: i64) -> Result<u64> {
        self.count_submissions_by_rubric_impl(rubric_id).await
    }

    // 评分标准模块
    async fn create_rubric(&self, owner_id: i64, rubric: CreateRubricRequest) -> Result<Rubric> {
        self.create_rubric_impl(owner_id, rubric).await
    }

    async fn get_rubric_by_id(&self, id: i64) -> Result<Option<Rubric>> {
        self.get_rubric_by_id_impl(id).await
    }

    async fn list_rubrics_with_pagination(
        &self,
        query: RubricListQuery,
        visible_to: Option<i64>,
    ) -> Result<RubricListResponse> {
        self.list_rubrics_with_pagination_impl(query, visible_to)
            .await
    }

    async fn update_rubric(&self, id: i64, update: UpdateRubricRequest) -> Result<Option<Rubric>> {
        self.update_rubric_impl(id, update).await
    }

    async fn delete_rubric(&self, id: i64) -> Result<bool> {
        self.delete_rubric_impl(id).await
    }

    // 评估模块
    async fn create_evaluation(&self, evaluation: NewEvaluation) -> Result<Evaluation> {
        self.create_evaluation_impl(evaluation).await
    }

    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>> {
        self.get_evaluation_by_id_impl(id).await
    }

    async fn find_active_evaluation(
        &self,
        submission_id: i64,
        evaluator_type: EvaluatorType,
    ) -> Result<Option<Evaluation>> {
        self.find_active_evaluation_impl(submission_id, evaluator_type)
            .await
    }

    async fn update_evaluation(
        &self,
        id: i64,
        patch: EvaluationPatch,
    ) -> Result<Option<Evaluation>> {
        self.update_evaluation_impl(id, patch).await
    }

    async fn list_evaluations_with_pagination(
        &self,
        query: EvaluationListQuery,
        visible_to: Option<i64>,
    ) -> Result<EvaluationListResponse> {
        self.list_evaluations_with_pagination_impl(query, visible_to)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::requests::CreateSubmissionRequest;
    use crate::models::users::entities::UserRole;

    async fn memory_storage() -> SeaOrmStorage {
        SeaOrmStorage::new_with_url(":memory:", 1, 5)
            .await
            .expect("in-memory storage")
    }

    async fn seed_student(storage: &SeaOrmStorage) -> User {
        storage
            .upsert_user_from_claims_impl(UpsertUserFromClaims {
                external_uid: "idp|student-1".to_string(),
                email: "alice@example.com".to_string(),
                display_name: Some("Alice".to_string()),
                role: UserRole::Student,
            })
            .await
            .expect("seed user")
    }

    fn draft_request(title: &str) -> CreateSubmissionRequest {
        CreateSubmissionRequest {
            title: title.to_string(),
            description: None,
            content: "First draft of the essay.".to_string(),
            rubric_id: None,
            attachment: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_user_is_idempotent_on_uid() {
        let storage = memory_storage().await;
        let first = seed_student(&storage).await;
        let second = storage
            .upsert_user_from_claims_impl(UpsertUserFromClaims {
                external_uid: "idp|student-1".to_string(),
                email: "alice@new.example.com".to_string(),
                display_name: Some("Alice".to_string()),
                role: UserRole::Student,
            })
            .await
            .expect("upsert again");

        assert_eq!(first.id, second.id);
        assert_eq!(second.email, "alice@new.example.com");
    }

    #[tokio::test]
    async fn test_create_submission_writes_version_one() {
        let storage = memory_storage().await;
        let student = seed_student(&storage).await;

        let submission = storage
            .create_submission_impl(student.id, draft_request("Essay"))
            .await
            .expect("create submission");

        assert_eq!(submission.current_version, 1);
        assert_eq!(submission.status, SubmissionStatus::Draft);

        let versions = storage
            .list_submission_versions_impl(submission.id)
            .await
            .expect("list versions");
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].version, 1);
        assert_eq!(versions[0].content, "First draft of the essay.");
    }

    #[tokio::test]
    async fn test_content_edit_appends_immutable_snapshot() {
        let storage = memory_storage().await;
        let student = seed_student(&storage).await;
        let submission = storage
            .create_submission_impl(student.id, draft_request("Essay"))
            .await
            .expect("create submission");

        let updated = storage
            .update_submission_impl(
                submission.id,
                student.id,
                UpdateSubmissionRequest {
                    content: Some("Second draft, much improved.".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
            .expect("exists");

        assert_eq!(updated.current_version, 2);

        let versions = storage
            .list_submission_versions_impl(submission.id)
            .await
            .expect("list versions");
        assert_eq!(versions.len(), 2);
        // 倒序：最新版本在前，旧快照原样保留
        assert_eq!(versions[0].version, 2);
        assert_eq!(versions[1].version, 1);
        assert_eq!(versions[1].content, "First draft of the essay.");
    }

    #[tokio::test]
    async fn test_metadata_edit_does_not_bump_version() {
        let storage = memory_storage().await;
        let student = seed_student(&storage).await;
        let submission = storage
            .create_submission_impl(student.id, draft_request("Essay"))
            .await
            .expect("create submission");

        let updated = storage
            .update_submission_impl(
                submission.id,
                student.id,
                UpdateSubmissionRequest {
                    title: Some("Renamed essay".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
            .expect("exists");

        assert_eq!(updated.current_version, 1);
        let versions = storage
            .list_submission_versions_impl(submission.id)
            .await
            .expect("list versions");
        assert_eq!(versions.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_submission_removes_versions_keeps_evaluations() {
        let storage = memory_storage().await;
        let student = seed_student(&storage).await;
        let submission = storage
            .create_submission_impl(student.id, draft_request("Essay"))
            .await
            .expect("create submission");

        let evaluation = storage
            .create_evaluation_impl(NewEvaluation {
                submission_id: submission.id,
                submission_version: 1,
                rubric_id: None,
                evaluator_id: student.id,
                evaluator_type: EvaluatorType::Teacher,
                status: crate::models::evaluations::entities::EvaluationStatus::Pending,
            })
            .await
            .expect("create evaluation");

        assert!(storage
            .delete_submission_impl(submission.id)
            .await
            .expect("delete"));

        let versions = storage
            .list_submission_versions_impl(submission.id)
            .await
            .expect("list versions");
        assert!(versions.is_empty());

        // 评估记录独立保留
        let kept = storage
            .get_evaluation_by_id_impl(evaluation.id)
            .await
            .expect("get evaluation");
        assert!(kept.is_some());
    }

    #[tokio::test]
    async fn test_list_evaluations_scoped_to_own_submissions() {
        use crate::models::evaluations::entities::EvaluationStatus;

        let storage = memory_storage().await;
        let alice = seed_student(&storage).await;
        let bob = storage
            .upsert_user_from_claims_impl(UpsertUserFromClaims {
                external_uid: "idp|student-2".to_string(),
                email: "bob@example.com".to_string(),
                display_name: Some("Bob".to_string()),
                role: UserRole::Student,
            })
            .await
            .expect("seed user");

        for student in [&alice, &bob] {
            let submission = storage
                .create_submission_impl(student.id, draft_request("Essay"))
                .await
                .expect("create submission");
            storage
                .create_evaluation_impl(NewEvaluation {
                    submission_id: submission.id,
                    submission_version: 1,
                    rubric_id: None,
                    evaluator_id: student.id,
                    evaluator_type: EvaluatorType::Teacher,
                    status: EvaluationStatus::Pending,
                })
                .await
                .expect("create evaluation");
        }

        let query = EvaluationListQuery {
            page: None,
            size: None,
            submission_id: None,
            evaluator_type: None,
            status: None,
        };

        let mine = storage
            .list_evaluations_with_pagination_impl(query.clone(), Some(alice.id))
            .await
            .expect("list scoped");
        assert_eq!(mine.items.len(), 1);
        assert_eq!(mine.items[0].evaluator_id, alice.id);

        let all = storage
            .list_evaluations_with_pagination_impl(query, None)
            .await
            .expect("list all");
        assert_eq!(all.items.len(), 2);
    }

    #[tokio::test]
    async fn test_find_active_evaluation_ignores_completed() {
        use crate::models::evaluations::entities::EvaluationStatus;

        let storage = memory_storage().await;
        let student = seed_student(&storage).await;
        let submission = storage
            .create_submission_impl(student.id, draft_request("Essay"))
            .await
            .expect("create submission");

        let evaluation = storage
            .create_evaluation_impl(NewEvaluation {
                submission_id: submission.id,
                submission_version: 1,
                rubric_id: None,
                evaluator_id: student.id,
                evaluator_type: EvaluatorType::Ai,
                status: EvaluationStatus::Pending,
            })
            .await
            .expect("create evaluation");

        let active = storage
            .find_active_evaluation_impl(submission.id, EvaluatorType::Ai)
            .await
            .expect("find active");
        assert!(active.is_some());

        // 另一执行方类型不受影响
        let teacher_active = storage
            .find_active_evaluation_impl(submission.id, EvaluatorType::Teacher)
            .await
            .expect("find active");
        assert!(teacher_active.is_none());

        storage
            .update_evaluation_impl(
                evaluation.id,
                EvaluationPatch {
                    status: Some(EvaluationStatus::Completed),
                    completed_at: Some(chrono::Utc::now()),
                    ..Default::default()
                },
            )
            .await
            .expect("complete");

        let active = storage
            .find_active_evaluation_impl(submission.id, EvaluatorType::Ai)
            .await
            .expect("find active");
        assert!(active.is_none());
    }
}
