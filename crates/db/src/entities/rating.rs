//! Rating entity.
//!
//! One row per (comparison, variant, rater): a unique index on that triple
//! enforces the at-most-one-rating-per-rater invariant, and the upsert in
//! [`crate::repositories::RatingRepository`] relies on it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rating")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Comparison item this rating belongs to.
    #[sea_orm(indexed)]
    pub comparison_id: String,

    /// Which generated output was rated: "model1" or "model2".
    pub variant: String,

    /// User who rated.
    #[sea_orm(indexed)]
    pub rater_id: String,

    /// Star values (JSON array of 6 integers, 0 = unrated factor).
    #[sea_orm(column_type = "Json")]
    pub stars: JsonValue,

    /// Last time this rating was created or replaced.
    pub rated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::comparison::Entity",
        from = "Column::ComparisonId",
        to = "super::comparison::Column::Id",
        on_delete = "Cascade"
    )]
    Comparison,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RaterId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Rater,
}

impl Related<super::comparison::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comparison.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rater.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
