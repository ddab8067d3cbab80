//! Handlers for subject profiles.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/userprofiles` | All profiles, unauthenticated |
//! | `POST` | `/userprofiles/create` | Staff token + [`NewProfile`] fields; 201 |
//! | `GET`  | `/student-profile` | `?name&registration_number&institution_name` |
//! | `POST` | `/redflag` | Body: [`FlagBody`]; increments `flag_count` |
//! | `GET`  | `/latlongs` | Distinct coordinate pairs |
//! | `GET`  | `/profile_by_latlong` | `?latitude&longitude`; exact match |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use liaison_core::{
  Liaison,
  profile::{Coordinates, Flag, NewProfile, Profile, ProfileKey},
  store::LiaisonStore,
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{JsonBody, QueryParams, bearer_token},
};

/// `GET /userprofiles`
pub async fn list<S>(
  State(service): State<Arc<Liaison<S>>>,
) -> Result<Json<Vec<Profile>>, ApiError>
where
  S: LiaisonStore + 'static,
{
  Ok(Json(service.list_profiles().await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub token:   Option<String>,
  #[serde(flatten)]
  pub profile: NewProfile,
}

/// `POST /userprofiles/create`
pub async fn create<S>(
  State(service): State<Arc<Liaison<S>>>,
  headers: HeaderMap,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LiaisonStore + 'static,
{
  let token = bearer_token(&headers, body.token);
  let profile = service.create_profile(&token, body.profile).await?;
  Ok((StatusCode::CREATED, Json(profile)))
}

// ─── Identity lookup ──────────────────────────────────────────────────────────

/// Missing parameters arrive as empty strings and fail validation. The
/// aliases are the names the mobile clients use for lookups and flags.
#[derive(Debug, Deserialize)]
pub struct IdentityParams {
  #[serde(default)]
  pub name:                String,
  #[serde(default, alias = "college_register_number", alias = "roll_number")]
  pub registration_number: String,
  #[serde(default, alias = "college_name", alias = "college")]
  pub institution_name:    String,
}

impl From<IdentityParams> for ProfileKey {
  fn from(p: IdentityParams) -> Self {
    ProfileKey {
      name:                p.name,
      registration_number: p.registration_number,
      institution_name:    p.institution_name,
    }
  }
}

/// `GET /student-profile?name=..&registration_number=..&institution_name=..`
pub async fn by_identity<S>(
  State(service): State<Arc<Liaison<S>>>,
  QueryParams(params): QueryParams<IdentityParams>,
) -> Result<Json<Profile>, ApiError>
where
  S: LiaisonStore + 'static,
{
  Ok(Json(service.find_profile(params.into()).await?))
}

// ─── Flag ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FlagBody {
  #[serde(flatten)]
  pub key:                  IdentityParams,
  pub flagged_reason:       Option<String>,
  /// Reference to stored evidence. Empty or absent keeps the previous one.
  pub flagged_reason_image: Option<String>,
}

/// `POST /redflag`
pub async fn flag<S>(
  State(service): State<Arc<Liaison<S>>>,
  JsonBody(body): JsonBody<FlagBody>,
) -> Result<Json<Profile>, ApiError>
where
  S: LiaisonStore + 'static,
{
  let flag = Flag {
    key:    body.key.into(),
    reason: body.flagged_reason,
    image:  body.flagged_reason_image,
  };
  Ok(Json(service.flag_profile(flag).await?))
}

// ─── Coordinates ──────────────────────────────────────────────────────────────

/// `GET /latlongs`
pub async fn coordinates<S>(
  State(service): State<Arc<Liaison<S>>>,
) -> Result<Json<Vec<Coordinates>>, ApiError>
where
  S: LiaisonStore + 'static,
{
  Ok(Json(service.distinct_coordinates().await?))
}

/// `GET /profile_by_latlong?latitude=..&longitude=..`
pub async fn by_coordinates<S>(
  State(service): State<Arc<Liaison<S>>>,
  QueryParams(at): QueryParams<Coordinates>,
) -> Result<Json<Profile>, ApiError>
where
  S: LiaisonStore + 'static,
{
  Ok(Json(service.find_profile_at(at).await?))
}
