//! Rating service.
//!
//! Star ratings are 6-factor integer vectors attached to one variant of a
//! comparison. Each rater holds at most one entry per (comparison, variant);
//! resubmitting replaces the stored vector in place. Aggregation is a plain
//! per-factor arithmetic mean over every stored entry, including all-zero
//! "cleared" vectors, so a cleared rating still counts toward the
//! contributor count and pulls the mean down.

use std::collections::HashMap;

use chrono::Utc;
use imgarena_common::{AppError, AppResult, IdGenerator};
use imgarena_db::{
    entities::rating,
    repositories::{ComparisonRepository, RatingRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Number of independently rated quality factors per variant.
pub const FACTOR_COUNT: usize = 6;

/// Highest allowed star value per factor. 0 means "unrated".
pub const MAX_STARS: i64 = 5;

/// One of the two generated outputs being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Model1,
    Model2,
}

impl Variant {
    /// Storage tag for this variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model1 => "model1",
            Self::Model2 => "model2",
        }
    }

    /// Parse a storage tag back into a variant.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "model1" => Some(Self::Model1),
            "model2" => Some(Self::Model2),
            _ => None,
        }
    }
}

/// Input for submitting a rating.
#[derive(Debug, Deserialize)]
pub struct SubmitRatingInput {
    pub comparison_id: String,
    pub variant: Variant,
    pub stars: Vec<i64>,
}

/// Per-variant aggregation result.
///
/// `stars` is `None` when no entries exist, which is distinct from a mean
/// of all zeros.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantAverage {
    pub stars: Option<[f64; FACTOR_COUNT]>,
    pub count: u64,
}

/// Aggregated means for both variants of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonAverages {
    pub model1: VariantAverage,
    pub model2: VariantAverage,
}

/// One rater's own stored vectors for both variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnRatings {
    pub model1: Option<[i64; FACTOR_COUNT]>,
    pub model2: Option<[i64; FACTOR_COUNT]>,
}

/// Bulk endpoint entry: the requesting rater's own vectors plus the
/// aggregate for one comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkEntry {
    pub own: OwnRatings,
    pub aggregate: ComparisonAverages,
}

/// Rating service for business logic.
#[derive(Clone)]
pub struct RatingService {
    rating_repo: RatingRepository,
    comparison_repo: ComparisonRepository,
    id_gen: IdGenerator,
}

impl RatingService {
    /// Create a new rating service.
    #[must_use]
    pub const fn new(rating_repo: RatingRepository, comparison_repo: ComparisonRepository) -> Self {
        Self {
            rating_repo,
            comparison_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a rating, replacing any earlier entry by the same rater for
    /// the same (comparison, variant).
    ///
    /// Clearing is a submit with an all-zero vector; the entry stays in
    /// place and keeps counting toward the aggregate.
    pub async fn submit(&self, rater_id: &str, input: SubmitRatingInput) -> AppResult<()> {
        validate_stars(&input.stars)?;

        // 404 before touching the rating table.
        self.comparison_repo.get_by_id(&input.comparison_id).await?;

        let model = rating::ActiveModel {
            id: Set(self.id_gen.generate()),
            comparison_id: Set(input.comparison_id.clone()),
            variant: Set(input.variant.as_str().to_string()),
            rater_id: Set(rater_id.to_string()),
            stars: Set(json!(input.stars)),
            rated_at: Set(Utc::now().into()),
        };
        self.rating_repo.upsert(model).await?;

        self.comparison_repo.touch(&input.comparison_id).await?;

        Ok(())
    }

    /// Aggregate means and contributor counts for both variants of a
    /// comparison. A comparison with no ratings yields `None` vectors with
    /// count 0 rather than an error.
    pub async fn averages_for(&self, comparison_id: &str) -> AppResult<ComparisonAverages> {
        let ratings = self.rating_repo.find_by_comparison(comparison_id).await?;
        Ok(aggregate(&ratings))
    }

    /// One rater's stored vectors for a comparison.
    pub async fn own(&self, comparison_id: &str, rater_id: &str) -> AppResult<OwnRatings> {
        let ratings = self.rating_repo.find_own(comparison_id, rater_id).await?;
        Ok(own_from(&ratings, rater_id))
    }

    /// Batched fetch for the listing view: own vectors plus aggregates for
    /// every requested comparison, in two queries total regardless of the
    /// number of identifiers.
    ///
    /// Unknown identifiers are omitted from the result. An empty input set
    /// returns an empty mapping.
    pub async fn bulk(
        &self,
        comparison_ids: &[String],
        rater_id: Option<&str>,
    ) -> AppResult<HashMap<String, BulkEntry>> {
        if comparison_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let comparisons = self.comparison_repo.find_by_ids(comparison_ids).await?;
        let found_ids: Vec<String> = comparisons.iter().map(|c| c.id.clone()).collect();
        let ratings = self.rating_repo.find_by_comparisons(&found_ids).await?;

        let mut grouped: HashMap<&str, Vec<&rating::Model>> = HashMap::new();
        for r in &ratings {
            grouped.entry(r.comparison_id.as_str()).or_default().push(r);
        }

        let mut result = HashMap::with_capacity(found_ids.len());
        for id in found_ids {
            let entries: Vec<rating::Model> = grouped
                .get(id.as_str())
                .map(|rs| rs.iter().map(|r| (*r).clone()).collect())
                .unwrap_or_default();

            let own = rater_id.map_or(
                OwnRatings {
                    model1: None,
                    model2: None,
                },
                |rid| own_from(&entries, rid),
            );

            result.insert(
                id,
                BulkEntry {
                    own,
                    aggregate: aggregate(&entries),
                },
            );
        }

        Ok(result)
    }
}

/// Validate a submitted star vector: exactly 6 integers, each 0 to 5.
fn validate_stars(stars: &[i64]) -> AppResult<()> {
    if stars.len() != FACTOR_COUNT {
        return Err(AppError::BadRequest(format!(
            "Star vector must have exactly {FACTOR_COUNT} values"
        )));
    }
    if stars.iter().any(|s| !(0..=MAX_STARS).contains(s)) {
        return Err(AppError::BadRequest(format!(
            "Star values must be between 0 and {MAX_STARS}"
        )));
    }
    Ok(())
}

/// Decode a stored star vector. Rows with a malformed vector are dropped
/// from read paths rather than failing them.
fn decode_stars(model: &rating::Model) -> Option<[i64; FACTOR_COUNT]> {
    match serde_json::from_value(model.stars.clone()) {
        Ok(stars) => Some(stars),
        Err(e) => {
            tracing::warn!(rating_id = %model.id, error = %e, "Malformed stored star vector");
            None
        }
    }
}

/// Per-factor arithmetic mean over a variant's entries. `None` iff the
/// list is empty; all-zero entries are counted like any other.
#[allow(clippy::cast_precision_loss)]
fn mean(vectors: &[[i64; FACTOR_COUNT]]) -> Option<[f64; FACTOR_COUNT]> {
    if vectors.is_empty() {
        return None;
    }

    let mut sums = [0i64; FACTOR_COUNT];
    for v in vectors {
        for (sum, value) in sums.iter_mut().zip(v) {
            *sum += value;
        }
    }

    let count = vectors.len() as f64;
    Some(sums.map(|s| s as f64 / count))
}

fn aggregate(ratings: &[rating::Model]) -> ComparisonAverages {
    let mut model1 = Vec::new();
    let mut model2 = Vec::new();
    for r in ratings {
        let Some(stars) = decode_stars(r) else {
            continue;
        };
        match Variant::parse(&r.variant) {
            Some(Variant::Model1) => model1.push(stars),
            Some(Variant::Model2) => model2.push(stars),
            None => {
                tracing::warn!(rating_id = %r.id, variant = %r.variant, "Unknown variant tag");
            }
        }
    }

    ComparisonAverages {
        model1: VariantAverage {
            stars: mean(&model1),
            count: model1.len() as u64,
        },
        model2: VariantAverage {
            stars: mean(&model2),
            count: model2.len() as u64,
        },
    }
}

fn own_from(ratings: &[rating::Model], rater_id: &str) -> OwnRatings {
    let mut own = OwnRatings {
        model1: None,
        model2: None,
    };
    for r in ratings.iter().filter(|r| r.rater_id == rater_id) {
        let stars = decode_stars(r);
        match Variant::parse(&r.variant) {
            Some(Variant::Model1) => own.model1 = stars,
            Some(Variant::Model2) => own.model2 = stars,
            None => {}
        }
    }
    own
}
