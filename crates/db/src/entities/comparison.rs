//! Comparison entity.
//!
//! One comparison item = one prompt + one input image + the two generated
//! variant images ("model1"/"model2") being rated against each other.
//! Image fields hold opaque storage keys produced by the generation
//! workflow; ratings live in the child `rating` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comparison")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Storage key of the input image.
    pub input_image: String,

    /// Storage key of the first model's output.
    pub model1_image: String,

    /// Storage key of the second model's output.
    pub model2_image: String,

    /// Free-text prompt the variants were generated from.
    #[sea_orm(column_type = "Text")]
    pub prompt: String,

    /// Author of the comparison item.
    #[sea_orm(indexed)]
    pub created_by: String,

    pub created_at: DateTimeWithTimeZone,

    /// Bumped whenever a rating is submitted for this item.
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Author,

    #[sea_orm(has_many = "super::rating::Entity")]
    Ratings,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
