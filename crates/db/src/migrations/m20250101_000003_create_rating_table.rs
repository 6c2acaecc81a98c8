//! Create rating table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rating::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Rating::ComparisonId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Rating::Variant).string_len(16).not_null())
                    .col(ColumnDef::new(Rating::RaterId).string_len(32).not_null())
                    .col(ColumnDef::new(Rating::Stars).json().not_null())
                    .col(
                        ColumnDef::new(Rating::RatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_comparison")
                            .from(Rating::Table, Rating::ComparisonId)
                            .to(Comparison::Table, Comparison::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_rater")
                            .from(Rating::Table, Rating::RaterId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: at most one rating per (comparison, variant, rater).
        // The upsert in RatingRepository targets this constraint.
        manager
            .create_index(
                Index::create()
                    .name("idx_rating_comparison_variant_rater")
                    .table(Rating::Table)
                    .col(Rating::ComparisonId)
                    .col(Rating::Variant)
                    .col(Rating::RaterId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: comparison_id (aggregation fetches all rows per item)
        manager
            .create_index(
                Index::create()
                    .name("idx_rating_comparison_id")
                    .table(Rating::Table)
                    .col(Rating::ComparisonId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rating::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Rating {
    Table,
    Id,
    ComparisonId,
    Variant,
    RaterId,
    Stars,
    RatedAt,
}

#[derive(Iden)]
enum Comparison {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
