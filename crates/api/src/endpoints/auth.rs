//! Session endpoints.
//!
//! There is no password. Signup and login are the same operation: resolve
//! the submitted email to a user, creating it on first sight, and issue a
//! signed session token returned both in the body and as a cookie.

use axum::{extract::State, routing::get, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use imgarena_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::{AppState, SESSION_COOKIE},
};

/// Session request (signup and login).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub email: String,
}

/// Session response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub email: String,
    pub token: String,
}

/// Current-user response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub created_at: String,
}

async fn start_session(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SessionRequest>,
) -> AppResult<(CookieJar, Json<SessionResponse>)> {
    let (user, token) = state.identity_service.start_session(&req.email).await?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .build();

    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            id: user.id,
            email: user.email,
            token,
        }),
    ))
}

async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    (
        jar.remove(Cookie::from(SESSION_COOKIE)),
        Json(serde_json::json!({ "success": true })),
    )
}

async fn me(AuthUser(user): AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: user.id,
        email: user.email,
        created_at: user.created_at.to_rfc3339(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(start_session))
        .route("/login", post(start_session))
        .route("/logout", post(logout))
        .route("/me", get(me))
}
