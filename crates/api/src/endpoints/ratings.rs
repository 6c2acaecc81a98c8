//! Rating endpoints.
//!
//! The write path (`submit`) surfaces validation and lookup failures as
//! client errors. The read paths (average, own, bulk) feed a listing view
//! that must never block on rating data, so they swallow internal failures
//! and return empty results instead.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use imgarena_core::{BulkEntry, OwnRatings, SubmitRatingInput, Variant, FACTOR_COUNT};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
};

/// Submit request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub comparison_id: String,
    pub variant: Variant,
    pub stars: Vec<i64>,
}

/// Submit response.
#[derive(Serialize)]
pub struct SubmitResponse {
    pub success: bool,
}

/// Per-variant contributor counts.
#[derive(Serialize)]
pub struct AverageCounts {
    pub model1: u64,
    pub model2: u64,
}

/// Average response: per-factor means for both variants, null when a
/// variant has no ratings.
#[derive(Serialize)]
pub struct AverageResponse {
    pub model1: Option<[f64; FACTOR_COUNT]>,
    pub model2: Option<[f64; FACTOR_COUNT]>,
    pub count: AverageCounts,
}

/// Single-comparison query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonQuery {
    pub comparison_id: String,
}

/// Bulk request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequest {
    pub comparison_ids: Vec<String>,
}

async fn submit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> imgarena_common::AppResult<Json<SubmitResponse>> {
    let input = SubmitRatingInput {
        comparison_id: req.comparison_id,
        variant: req.variant,
        stars: req.stars,
    };
    state.rating_service.submit(&user.id, input).await?;
    Ok(Json(SubmitResponse { success: true }))
}

async fn average(
    State(state): State<AppState>,
    Query(query): Query<ComparisonQuery>,
) -> Json<AverageResponse> {
    match state.rating_service.averages_for(&query.comparison_id).await {
        Ok(agg) => Json(AverageResponse {
            model1: agg.model1.stars,
            model2: agg.model2.stars,
            count: AverageCounts {
                model1: agg.model1.count,
                model2: agg.model2.count,
            },
        }),
        Err(e) => {
            tracing::warn!(comparison_id = %query.comparison_id, error = %e, "Average fetch failed");
            Json(AverageResponse {
                model1: None,
                model2: None,
                count: AverageCounts { model1: 0, model2: 0 },
            })
        }
    }
}

async fn own(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<ComparisonQuery>,
) -> Json<OwnRatings> {
    let empty = OwnRatings {
        model1: None,
        model2: None,
    };

    let Some(user) = user else {
        return Json(empty);
    };

    match state
        .rating_service
        .own(&query.comparison_id, &user.id)
        .await
    {
        Ok(own) => Json(own),
        Err(e) => {
            tracing::warn!(comparison_id = %query.comparison_id, error = %e, "Own-rating fetch failed");
            Json(empty)
        }
    }
}

async fn bulk(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<BulkRequest>,
) -> Json<HashMap<String, BulkEntry>> {
    let rater_id = user.as_ref().map(|u| u.id.as_str());

    match state.rating_service.bulk(&req.comparison_ids, rater_id).await {
        Ok(mapping) => Json(mapping),
        Err(e) => {
            tracing::warn!(error = %e, "Bulk rating fetch failed");
            Json(HashMap::new())
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submit", post(submit))
        .route("/average", get(average))
        .route("/own", get(own))
        .route("/bulk", post(bulk))
}
