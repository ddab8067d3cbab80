//! Handlers for `/tasks` endpoints. Every route requires a police token and
//! only ever sees tasks created under that token.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/tasks` | `?token=..` or `Authorization` header |
//! | `POST` | `/tasks/create` | Body: `{"token","assigned_officer","description"}`; 201 |
//! | `PUT`  | `/tasks/update/:id` | Body: `{"token","completed":bool}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use liaison_core::{Error, Liaison, store::LiaisonStore, task::{NewTask, Task}};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{JsonBody, QueryParams, bearer_token},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub token: Option<String>,
}

/// `GET /tasks[?token=..]`
pub async fn list<S>(
  State(service): State<Arc<Liaison<S>>>,
  headers: HeaderMap,
  QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<Task>>, ApiError>
where
  S: LiaisonStore + 'static,
{
  let token = bearer_token(&headers, params.token);
  Ok(Json(service.tasks_for_owner(&token).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub token:            Option<String>,
  /// Free-text label; the mobile client sends it as `police_user`.
  #[serde(default, alias = "police_user")]
  pub assigned_officer: String,
  #[serde(default)]
  pub description:      String,
}

/// `POST /tasks/create`
pub async fn create<S>(
  State(service): State<Arc<Liaison<S>>>,
  headers: HeaderMap,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LiaisonStore + 'static,
{
  let token = bearer_token(&headers, body.token);
  let input = NewTask {
    assigned_officer: body.assigned_officer,
    description:      body.description,
  };
  let task = service.create_task(&token, input).await?;
  Ok((StatusCode::CREATED, Json(task)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub token:     Option<String>,
  pub completed: Option<bool>,
}

/// `PUT /tasks/update/:id`
pub async fn update<S>(
  State(service): State<Arc<Liaison<S>>>,
  Path(task_id): Path<i64>,
  headers: HeaderMap,
  JsonBody(body): JsonBody<UpdateBody>,
) -> Result<Json<Task>, ApiError>
where
  S: LiaisonStore + 'static,
{
  let completed = body
    .completed
    .ok_or_else(|| Error::validation("completed is required"))?;
  let token = bearer_token(&headers, body.token);
  Ok(Json(service.set_task_completion(&token, task_id, completed).await?))
}
