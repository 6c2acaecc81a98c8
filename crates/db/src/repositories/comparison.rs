//! Comparison repository.

use std::sync::Arc;

use crate::entities::{Comparison, comparison};
use imgarena_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::Expr,
};

/// Comparison repository for database operations.
#[derive(Clone)]
pub struct ComparisonRepository {
    db: Arc<DatabaseConnection>,
}

impl ComparisonRepository {
    /// Create a new comparison repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comparison by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comparison::Model>> {
        Comparison::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a comparison by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<comparison::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ComparisonNotFound(id.to_string()))
    }

    /// Find comparisons by IDs in one batched query.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<comparison::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Comparison::find()
            .filter(comparison::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List comparisons, newest first.
    pub async fn find_all(
        &self,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<comparison::Model>> {
        Comparison::find()
            .order_by_desc(comparison::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new comparison.
    pub async fn create(&self, model: comparison::ActiveModel) -> AppResult<comparison::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Bump the last-modified timestamp (single UPDATE query, no fetch).
    pub async fn touch(&self, id: &str) -> AppResult<()> {
        Comparison::update_many()
            .col_expr(
                comparison::Column::UpdatedAt,
                Expr::current_timestamp().into(),
            )
            .filter(comparison::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_comparison(id: &str) -> comparison::Model {
        comparison::Model {
            id: id.to_string(),
            input_image: "2024/01/01/input.png".to_string(),
            model1_image: "2024/01/01/out_model1.png".to_string(),
            model2_image: "2024/01/01/out_model2.png".to_string(),
            prompt: "a red bicycle in the rain".to_string(),
            created_by: "user1".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comparison::Model>::new()])
                .into_connection(),
        );

        let repo = ComparisonRepository::new(db);
        let result = repo.get_by_id("missing").await;

        match result {
            Err(AppError::ComparisonNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected ComparisonNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_find_by_ids_empty_set_skips_query() {
        // No query results appended: an issued query would fail the mock.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = ComparisonRepository::new(db);
        let result = repo.find_by_ids(&[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_ids_batched() {
        let a = create_test_comparison("cmp1");
        let b = create_test_comparison("cmp2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![a.clone(), b.clone()]])
                .into_connection(),
        );

        let repo = ComparisonRepository::new(db);
        let result = repo
            .find_by_ids(&["cmp1".to_string(), "cmp2".to_string()])
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_touch_issues_single_update() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ComparisonRepository::new(db);
        repo.touch("cmp1").await.unwrap();
    }
}
