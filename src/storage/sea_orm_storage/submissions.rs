//! 提交存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::submission_versions::{
    ActiveModel as VersionActiveModel, Column as VersionColumn, Entity as SubmissionVersions,
};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{EvalHubError, Result};
use crate::models::{
    PaginationInfo,
    submissions::{
        entities::{Submission, SubmissionStatus, SubmissionVersion},
        requests::{CreateSubmissionRequest, SubmissionListQuery, UpdateSubmissionRequest},
        responses::{SubmissionListItem, SubmissionListResponse, SubmissionStudent},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建提交（草稿状态，同一事务写入版本 1 快照）
    pub async fn create_submission_impl(
        &self,
        student_id: i64,
        req: CreateSubmissionRequest,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalHubError::database_operation(format!("开启事务失败: {e}")))?;

        let (file_name, file_url, file_mime_type, file_size) = match req.attachment {
            Some(att) => (
                Some(att.original_name),
                Some(att.url),
                Some(att.mime_type),
                att.size,
            ),
            None => (None, None, None, None),
        };

        let model = ActiveModel {
            student_id: Set(student_id),
            title: Set(req.title),
            description: Set(req.description),
            content: Set(req.content.clone()),
            file_name: Set(file_name),
            file_url: Set(file_url),
            file_mime_type: Set(file_mime_type),
            file_size: Set(file_size),
            status: Set(SubmissionStatus::Draft.to_string()),
            current_version: Set(1),
            rubric_id: Set(req.rubric_id),
            created_at: Set(now),
            updated_at: Set(now),
            submitted_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("创建提交失败: {e}")))?;

        let snapshot = VersionActiveModel {
            submission_id: Set(result.id),
            version: Set(1),
            content: Set(req.content),
            created_by: Set(student_id),
            created_at: Set(now),
            ..Default::default()
        };

        snapshot
            .insert(&txn)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("创建版本快照失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EvalHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 分页列出提交
    pub async fn list_submissions_with_pagination_impl(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Submissions::find();

        // 状态筛选
        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 提交者筛选
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        // 评分标准筛选
        if let Some(rubric_id) = query.rubric_id {
            select = select.filter(Column::RubricId.eq(rubric_id));
        }

        // 排序
        select = select.order_by_desc(Column::UpdatedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询提交总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询提交页数失败: {e}")))?;

        let submissions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询提交列表失败: {e}")))?;

        // 批量查询提交者信息
        let student_ids: Vec<i64> = submissions
            .iter()
            .map(|s| s.student_id)
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        let users = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询用户信息失败: {e}")))?;

        let user_map: HashMap<i64, _> = users.into_iter().map(|u| (u.id, u)).collect();

        let items = submissions
            .into_iter()
            .map(|s| {
                let student = user_map.get(&s.student_id).map(|u| SubmissionStudent {
                    id: u.id,
                    email: u.email.clone(),
                    display_name: u.display_name.clone(),
                });
                SubmissionListItem {
                    submission: s.into_submission(),
                    student,
                }
            })
            .collect();

        Ok(SubmissionListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新提交
    ///
    /// 内容变化时在同一事务内递增 current_version 并追加不可变快照；
    /// 状态进入 submitted 时记录提交时间。
    pub async fn update_submission_impl(
        &self,
        id: i64,
        editor_id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalHubError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(found) = Submissions::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询提交失败: {e}")))?
        else {
            return Ok(None);
        };

        let content_changed = update
            .content
            .as_ref()
            .is_some_and(|c| *c != found.content);
        let next_version = if content_changed {
            found.current_version + 1
        } else {
            found.current_version
        };
        let submission_id = found.id;

        let mut model: ActiveModel = found.into();

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(ref content) = update.content {
            model.content = Set(content.clone());
            model.current_version = Set(next_version);
        }
        if let Some(rubric_id) = update.rubric_id {
            model.rubric_id = Set(Some(rubric_id));
        }
        if let Some(att) = update.attachment {
            model.file_name = Set(Some(att.original_name));
            model.file_url = Set(Some(att.url));
            model.file_mime_type = Set(Some(att.mime_type));
            model.file_size = Set(att.size);
        }
        if let Some(ref status) = update.status {
            model.status = Set(status.to_string());
            if *status == SubmissionStatus::Submitted {
                model.submitted_at = Set(Some(now));
            }
        }
        model.updated_at = Set(now);

        let result = model
            .update(&txn)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("更新提交失败: {e}")))?;

        if content_changed {
            let snapshot = VersionActiveModel {
                submission_id: Set(submission_id),
                version: Set(next_version),
                content: Set(result.content.clone()),
                created_by: Set(editor_id),
                created_at: Set(now),
                ..Default::default()
            };

            snapshot
                .insert(&txn)
                .await
                .map_err(|e| EvalHubError::database_operation(format!("创建版本快照失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| EvalHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(result.into_submission()))
    }

    /// 仅更新提交状态
    pub async fn set_submission_status_impl(
        &self,
        id: i64,
        status: SubmissionStatus,
    ) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Submissions::update_many()
            .col_expr(
                Column::Status,
                sea_orm::sea_query::Expr::value(status.to_string()),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("更新提交状态失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 删除提交及其全部版本快照（评估记录独立保留）
    pub async fn delete_submission_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalHubError::database_operation(format!("开启事务失败: {e}")))?;

        SubmissionVersions::delete_many()
            .filter(VersionColumn::SubmissionId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("删除版本快照失败: {e}")))?;

        let result = Submissions::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("删除提交失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EvalHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 列出提交的版本历史（版本号倒序）
    pub async fn list_submission_versions_impl(
        &self,
        submission_id: i64,
    ) -> Result<Vec<SubmissionVersion>> {
        let results = SubmissionVersions::find()
            .filter(VersionColumn::SubmissionId.eq(submission_id))
            .order_by_desc(VersionColumn::Version)
            .all(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询版本历史失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_version()).collect())
    }

    /// 获取指定版本快照
    pub async fn get_submission_version_impl(
        &self,
        submission_id: i64,
        version: i32,
    ) -> Result<Option<SubmissionVersion>> {
        let result = SubmissionVersions::find()
            .filter(VersionColumn::SubmissionId.eq(submission_id))
            .filter(VersionColumn::Version.eq(version))
            .one(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询版本快照失败: {e}")))?;

        Ok(result.map(|m| m.into_version()))
    }

    /// 统计引用某评分标准的提交数
    pub async fn count_submissions_by_rubric_impl(&self, rubric_id: i64) -> Result<u64> {
        let count = Submissions::find()
            .filter(Column::RubricId.eq(rubric_id))
            .count(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("统计提交数失败: {e}")))?;

        Ok(count)
    }
}
