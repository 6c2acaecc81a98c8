//! Comparison service.

use chrono::Utc;
use imgarena_common::{AppResult, IdGenerator};
use imgarena_db::{entities::comparison, repositories::ComparisonRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Default page size for the dashboard listing.
const DEFAULT_PAGE_SIZE: u64 = 50;

/// Maximum page size for the dashboard listing.
const MAX_PAGE_SIZE: u64 = 100;

/// Comparison service for business logic.
#[derive(Clone)]
pub struct ComparisonService {
    comparison_repo: ComparisonRepository,
    id_gen: IdGenerator,
}

/// Input for creating a comparison.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateComparisonInput {
    #[validate(length(min = 1, max = 512))]
    pub input_image: String,

    #[validate(length(min = 1, max = 512))]
    pub model1_image: String,

    #[validate(length(min = 1, max = 512))]
    pub model2_image: String,

    #[validate(length(min = 1, max = 4000))]
    pub prompt: String,
}

impl ComparisonService {
    /// Create a new comparison service.
    #[must_use]
    pub const fn new(comparison_repo: ComparisonRepository) -> Self {
        Self {
            comparison_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Record a finished generation run as a comparison.
    pub async fn create(
        &self,
        author_id: &str,
        input: CreateComparisonInput,
    ) -> AppResult<comparison::Model> {
        input.validate()?;

        let now = Utc::now();
        let model = comparison::ActiveModel {
            id: Set(self.id_gen.generate()),
            input_image: Set(input.input_image),
            model1_image: Set(input.model1_image),
            model2_image: Set(input.model2_image),
            prompt: Set(input.prompt),
            created_by: Set(author_id.to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        self.comparison_repo.create(model).await
    }

    /// Get a comparison by ID.
    pub async fn get(&self, id: &str) -> AppResult<comparison::Model> {
        self.comparison_repo.get_by_id(id).await
    }

    /// List comparisons for the dashboard, newest first.
    pub async fn list(
        &self,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> AppResult<Vec<comparison::Model>> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        self.comparison_repo
            .find_all(limit, offset.unwrap_or(0))
            .await
    }
}
