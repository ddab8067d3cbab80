//! Handlers for feedback and broadcasts. Both accept a token of either
//! principal kind.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/feedback/create` | Body: `{"token","feedback","rating":1..5}`; 201 |
//! | `GET`  | `/feedback` | All feedback |
//! | `POST` | `/broadcast/create` | Body: token + [`BroadcastContent`]; 201 |
//! | `GET`  | `/broadcast` | Latest event date first |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use liaison_core::{
  Error, Liaison,
  channel::{Broadcast, BroadcastContent, Feedback},
  store::LiaisonStore,
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{JsonBody, bearer_token},
};

// ─── Feedback ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FeedbackBody {
  pub token:    Option<String>,
  #[serde(default)]
  pub feedback: String,
  /// Signed so that out-of-range values surface as validation errors rather
  /// than decode failures.
  pub rating:   Option<i64>,
}

/// `POST /feedback/create`
pub async fn submit_feedback<S>(
  State(service): State<Arc<Liaison<S>>>,
  headers: HeaderMap,
  JsonBody(body): JsonBody<FeedbackBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LiaisonStore + 'static,
{
  let rating = body.rating.ok_or_else(|| Error::validation("rating is required"))?;
  let token = bearer_token(&headers, body.token);
  let feedback = service.submit_feedback(&token, &body.feedback, rating).await?;
  Ok((StatusCode::CREATED, Json(feedback)))
}

/// `GET /feedback`
pub async fn list_feedback<S>(
  State(service): State<Arc<Liaison<S>>>,
) -> Result<Json<Vec<Feedback>>, ApiError>
where
  S: LiaisonStore + 'static,
{
  Ok(Json(service.list_feedback().await?))
}

// ─── Broadcast ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BroadcastBody {
  pub token:   Option<String>,
  #[serde(flatten)]
  pub content: BroadcastContent,
}

/// `POST /broadcast/create`
pub async fn create_broadcast<S>(
  State(service): State<Arc<Liaison<S>>>,
  headers: HeaderMap,
  JsonBody(body): JsonBody<BroadcastBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LiaisonStore + 'static,
{
  let token = bearer_token(&headers, body.token);
  let broadcast = service.create_broadcast(&token, body.content).await?;
  Ok((StatusCode::CREATED, Json(broadcast)))
}

/// `GET /broadcast`
pub async fn list_broadcasts<S>(
  State(service): State<Arc<Liaison<S>>>,
) -> Result<Json<Vec<Broadcast>>, ApiError>
where
  S: LiaisonStore + 'static,
{
  Ok(Json(service.list_broadcasts().await?))
}
