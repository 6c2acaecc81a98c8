//! Comparison endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use imgarena_common::AppResult;
use imgarena_core::CreateComparisonInput;
use imgarena_db::entities::comparison::Model as ComparisonModel;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState};

/// Comparison response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResponse {
    pub id: String,
    pub input_image: String,
    pub model1_image: String,
    pub model2_image: String,
    pub prompt: String,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ComparisonModel> for ComparisonResponse {
    fn from(c: ComparisonModel) -> Self {
        Self {
            id: c.id,
            input_image: c.input_image,
            model1_image: c.model1_image,
            model2_image: c.model2_image,
            prompt: c.prompt,
            created_by: c.created_by,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

/// Create comparison request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComparisonRequest {
    pub input_image: String,
    pub model1_image: String,
    pub model2_image: String,
    pub prompt: String,
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

async fn create_comparison(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateComparisonRequest>,
) -> AppResult<Json<ComparisonResponse>> {
    let input = CreateComparisonInput {
        input_image: req.input_image,
        model1_image: req.model1_image,
        model2_image: req.model2_image,
        prompt: req.prompt,
    };
    let comparison = state.comparison_service.create(&user.id, input).await?;
    Ok(Json(comparison.into()))
}

async fn list_comparisons(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ComparisonResponse>>> {
    let comparisons = state
        .comparison_service
        .list(query.limit, query.offset)
        .await?;
    Ok(Json(comparisons.into_iter().map(Into::into).collect()))
}

async fn get_comparison(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ComparisonResponse>> {
    let comparison = state.comparison_service.get(&id).await?;
    Ok(Json(comparison.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_comparison).get(list_comparisons))
        .route("/{id}", get(get_comparison))
}
