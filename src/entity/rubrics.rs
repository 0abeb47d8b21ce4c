//! 评分标准实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rubrics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    // 评分项列表的 JSON 序列化
    #[sea_orm(column_type = "Text")]
    pub criteria: String,
    pub max_total_score: f64,
    pub is_public: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_rubric(
        self,
        owner_name: Option<String>,
    ) -> crate::models::rubrics::entities::Rubric {
        use crate::models::rubrics::entities::Rubric;
        use chrono::{DateTime, Utc};

        Rubric {
            id: self.id,
            owner_id: self.owner_id,
            owner_name,
            title: self.title,
            description: self.description,
            criteria: serde_json::from_str(&self.criteria).unwrap_or_default(),
            max_total_score: self.max_total_score,
            is_public: self.is_public,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
