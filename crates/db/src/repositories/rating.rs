//! Rating repository.
//!
//! Storage half of the rating upsert: a single conditional INSERT targeting
//! the unique `(comparison_id, variant, rater_id)` index. There is no
//! read-modify-write window, so two near-simultaneous first submissions from
//! the same rater cannot produce a duplicate entry.

use std::sync::Arc;

use crate::entities::{Rating, rating};
use imgarena_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, sea_query::OnConflict,
};

/// Rating repository for database operations.
#[derive(Clone)]
pub struct RatingRepository {
    db: Arc<DatabaseConnection>,
}

impl RatingRepository {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a rating, or replace the star vector and timestamp of the
    /// existing entry for the same (comparison, variant, rater) in place.
    ///
    /// Executes as one atomic `INSERT ... ON CONFLICT DO UPDATE`; the
    /// entry's row identity is stable across replacements.
    pub async fn upsert(&self, model: rating::ActiveModel) -> AppResult<()> {
        Rating::insert(model)
            .on_conflict(
                OnConflict::columns([
                    rating::Column::ComparisonId,
                    rating::Column::Variant,
                    rating::Column::RaterId,
                ])
                .update_columns([rating::Column::Stars, rating::Column::RatedAt])
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get all ratings for a comparison (both variants).
    pub async fn find_by_comparison(&self, comparison_id: &str) -> AppResult<Vec<rating::Model>> {
        Rating::find()
            .filter(rating::Column::ComparisonId.eq(comparison_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all ratings for a set of comparisons in one batched query.
    pub async fn find_by_comparisons(
        &self,
        comparison_ids: &[String],
    ) -> AppResult<Vec<rating::Model>> {
        if comparison_ids.is_empty() {
            return Ok(vec![]);
        }

        Rating::find()
            .filter(rating::Column::ComparisonId.is_in(comparison_ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get one rater's entries for a comparison (at most one per variant).
    pub async fn find_own(
        &self,
        comparison_id: &str,
        rater_id: &str,
    ) -> AppResult<Vec<rating::Model>> {
        Rating::find()
            .filter(rating::Column::ComparisonId.eq(comparison_id))
            .filter(rating::Column::RaterId.eq(rater_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};
    use serde_json::json;
    use std::sync::Arc;

    fn create_test_rating(comparison_id: &str, variant: &str, rater_id: &str) -> rating::Model {
        rating::Model {
            id: "rating1".to_string(),
            comparison_id: comparison_id.to_string(),
            variant: variant.to_string(),
            rater_id: rater_id.to_string(),
            stars: json!([5, 4, 3, 2, 1, 0]),
            rated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_upsert_targets_unique_triple() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = RatingRepository::new(Arc::clone(&db));
        let model = rating::ActiveModel {
            id: Set("rating1".to_string()),
            comparison_id: Set("cmp1".to_string()),
            variant: Set("model1".to_string()),
            rater_id: Set("user1".to_string()),
            stars: Set(json!([4, 0, 0, 0, 0, 0])),
            rated_at: Set(Utc::now().into()),
        };

        repo.upsert(model).await.unwrap();

        // The statement must resolve a duplicate (comparison, variant,
        // rater) by replacing the vector and timestamp in place; anything
        // else (a plain INSERT, a DELETE) breaks the one-entry-per-rater
        // invariant under resubmission.
        drop(repo);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql = format!("{log:?}").replace("\\\"", "\"");
        assert!(
            sql.contains(r#"ON CONFLICT ("comparison_id", "variant", "rater_id") DO UPDATE SET"#),
            "upsert must target the unique triple: {sql}"
        );
        assert!(sql.contains(r#""stars" = "excluded"."stars""#));
        assert!(sql.contains(r#""rated_at" = "excluded"."rated_at""#));
    }

    #[tokio::test]
    async fn test_find_by_comparisons_empty_set_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = RatingRepository::new(db);
        let result = repo.find_by_comparisons(&[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_find_own_returns_both_variants() {
        let m1 = create_test_rating("cmp1", "model1", "user1");
        let m2 = create_test_rating("cmp1", "model2", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![m1.clone(), m2.clone()]])
                .into_connection(),
        );

        let repo = RatingRepository::new(db);
        let result = repo.find_own("cmp1", "user1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.rater_id == "user1"));
    }
}
