//! Create comparison table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comparison::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comparison::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Comparison::InputImage)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Comparison::Model1Image)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Comparison::Model2Image)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Comparison::Prompt).text().not_null())
                    .col(
                        ColumnDef::new(Comparison::CreatedBy)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Comparison::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Comparison::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comparison_created_by")
                            .from(Comparison::Table, Comparison::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: created_at (listing is newest-first)
        manager
            .create_index(
                Index::create()
                    .name("idx_comparison_created_at")
                    .table(Comparison::Table)
                    .col(Comparison::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: created_by
        manager
            .create_index(
                Index::create()
                    .name("idx_comparison_created_by")
                    .table(Comparison::Table)
                    .col(Comparison::CreatedBy)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comparison::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Comparison {
    Table,
    Id,
    InputImage,
    Model1Image,
    Model2Image,
    Prompt,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
