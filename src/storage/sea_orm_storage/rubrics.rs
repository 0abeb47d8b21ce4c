//! 评分标准存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::rubrics::{ActiveModel, Column, Entity as Rubrics};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{EvalHubError, Result};
use crate::models::{
    PaginationInfo,
    rubrics::{
        entities::Rubric,
        requests::{CreateRubricRequest, RubricListQuery, UpdateRubricRequest},
        responses::RubricListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建评分标准（满分始终为各评分项满分之和）
    pub async fn create_rubric_impl(
        &self,
        owner_id: i64,
        req: CreateRubricRequest,
    ) -> Result<Rubric> {
        let now = chrono::Utc::now().timestamp();

        let max_total_score: f64 = req.criteria.iter().map(|c| c.max_score).sum();
        let criteria_json = serde_json::to_string(&req.criteria)
            .map_err(|e| EvalHubError::serialization(format!("序列化评分项失败: {e}")))?;

        let model = ActiveModel {
            owner_id: Set(owner_id),
            title: Set(req.title),
            description: Set(req.description),
            criteria: Set(criteria_json),
            max_total_score: Set(max_total_score),
            is_public: Set(req.is_public),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("创建评分标准失败: {e}")))?;

        let owner_name = self.get_owner_display_name(owner_id).await?;
        Ok(result.into_rubric(owner_name))
    }

    /// 通过 ID 获取评分标准
    pub async fn get_rubric_by_id_impl(&self, id: i64) -> Result<Option<Rubric>> {
        let result = Rubrics::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询评分标准失败: {e}")))?;

        match result {
            Some(model) => {
                let owner_name = self.get_owner_display_name(model.owner_id).await?;
                Ok(Some(model.into_rubric(owner_name)))
            }
            None => Ok(None),
        }
    }

    /// 分页列出评分标准
    ///
    /// visible_to 非空时限定为公开的或该用户拥有的。
    pub async fn list_rubrics_with_pagination_impl(
        &self,
        query: RubricListQuery,
        visible_to: Option<i64>,
    ) -> Result<RubricListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Rubrics::find();

        if let Some(viewer_id) = visible_to {
            select = select.filter(
                Condition::any()
                    .add(Column::IsPublic.eq(true))
                    .add(Column::OwnerId.eq(viewer_id)),
            );
        }

        if let Some(owner_id) = query.owner_id {
            select = select.filter(Column::OwnerId.eq(owner_id));
        }

        if let Some(is_public) = query.is_public {
            select = select.filter(Column::IsPublic.eq(is_public));
        }

        select = select.order_by_desc(Column::UpdatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            EvalHubError::database_operation(format!("查询评分标准总数失败: {e}"))
        })?;

        let pages = paginator.num_pages().await.map_err(|e| {
            EvalHubError::database_operation(format!("查询评分标准页数失败: {e}"))
        })?;

        let rubrics = paginator.fetch_page(page - 1).await.map_err(|e| {
            EvalHubError::database_operation(format!("查询评分标准列表失败: {e}"))
        })?;

        // 批量查询所有者信息
        let owner_ids: Vec<i64> = rubrics
            .iter()
            .map(|r| r.owner_id)
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        let users = Users::find()
            .filter(UserColumn::Id.is_in(owner_ids))
            .all(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询用户信息失败: {e}")))?;

        let user_map: HashMap<i64, _> = users.into_iter().map(|u| (u.id, u)).collect();

        let items = rubrics
            .into_iter()
            .map(|r| {
                let owner_name = user_map
                    .get(&r.owner_id)
                    .map(|u| u.display_name.clone().unwrap_or_else(|| u.email.clone()));
                r.into_rubric(owner_name)
            })
            .collect();

        Ok(RubricListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新评分标准（criteria 整体替换，满分随之重算）
    pub async fn update_rubric_impl(
        &self,
        id: i64,
        update: UpdateRubricRequest,
    ) -> Result<Option<Rubric>> {
        let now = chrono::Utc::now().timestamp();

        let Some(found) = Rubrics::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询评分标准失败: {e}")))?
        else {
            return Ok(None);
        };

        let owner_id = found.owner_id;
        let mut model: ActiveModel = found.into();

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(criteria) = update.criteria {
            let max_total_score: f64 = criteria.iter().map(|c| c.max_score).sum();
            let criteria_json = serde_json::to_string(&criteria)
                .map_err(|e| EvalHubError::serialization(format!("序列化评分项失败: {e}")))?;
            model.criteria = Set(criteria_json);
            model.max_total_score = Set(max_total_score);
        }
        if let Some(is_public) = update.is_public {
            model.is_public = Set(is_public);
        }
        model.updated_at = Set(now);

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("更新评分标准失败: {e}")))?;

        let owner_name = self.get_owner_display_name(owner_id).await?;
        Ok(Some(result.into_rubric(owner_name)))
    }

    /// 删除评分标准
    pub async fn delete_rubric_impl(&self, id: i64) -> Result<bool> {
        let result = Rubrics::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("删除评分标准失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    async fn get_owner_display_name(&self, owner_id: i64) -> Result<Option<String>> {
        let user = Users::find_by_id(owner_id)
            .one(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询用户信息失败: {e}")))?;

        Ok(user.map(|u| u.display_name.unwrap_or(u.email)))
    }
}
