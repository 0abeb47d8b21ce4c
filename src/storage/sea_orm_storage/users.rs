//! 用户存储操作

use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{EvalHubError, Result};
use crate::models::users::{entities::User, requests::UpsertUserFromClaims};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过 IdP 标识获取用户
    pub async fn get_user_by_uid_impl(&self, external_uid: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::ExternalUid.eq(external_uid))
            .one(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 按 IdP 令牌声明创建或更新本地用户
    ///
    /// 首次见到的 external_uid 建档；已存在时同步邮箱、显示名和角色。
    pub async fn upsert_user_from_claims_impl(&self, claims: UpsertUserFromClaims) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let existing = Users::find()
            .filter(Column::ExternalUid.eq(claims.external_uid.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询用户失败: {e}")))?;

        if let Some(found) = existing {
            let unchanged = found.email == claims.email
                && found.display_name == claims.display_name
                && found.role == claims.role.to_string();
            if unchanged {
                return Ok(found.into_user());
            }

            let mut model: ActiveModel = found.into();
            model.email = Set(claims.email);
            model.display_name = Set(claims.display_name);
            model.role = Set(claims.role.to_string());
            model.updated_at = Set(now);

            let result = model
                .update(&self.db)
                .await
                .map_err(|e| EvalHubError::database_operation(format!("更新用户失败: {e}")))?;

            return Ok(result.into_user());
        }

        let model = ActiveModel {
            external_uid: Set(claims.external_uid),
            email: Set(claims.email),
            display_name: Set(claims.display_name),
            role: Set(claims.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }
}
