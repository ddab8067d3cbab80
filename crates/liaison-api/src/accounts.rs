//! Handlers for sign-up, login, and the officer directory.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/test` | Liveness probe |
//! | `POST` | `/signup` | Body: [`SignUpBody`]; 201 + principal with token |
//! | `POST` | `/login` | Body: `{"email":..,"password":..}` |
//! | `GET`  | `/police` | Officer directory, no credentials |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use liaison_core::{
  Error, Liaison,
  principal::{NewOfficer, NewPrincipal, NewStaff, OfficerSummary, PrincipalKind, Token},
  store::LiaisonStore,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{error::ApiError, extract::JsonBody};

/// `GET /test`
pub async fn ping() -> Json<Value> { Json(json!({ "message": "API Working" })) }

// ─── Sign up ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignUpBody {
  /// `"staff"` or `"police"`, case-insensitive.
  pub user_type:        Option<String>,
  pub name:             Option<String>,
  pub email:            Option<String>,
  pub password:         Option<String>,
  pub profession:       Option<String>,
  /// Staff only.
  #[serde(alias = "college_name")]
  pub institution_name: Option<String>,
}

impl SignUpBody {
  fn into_new_principal(self) -> Result<NewPrincipal, Error> {
    let (Some(user_type), Some(name), Some(email), Some(password), Some(profession)) =
      (self.user_type, self.name, self.email, self.password, self.profession)
    else {
      return Err(Error::validation("all fields are required"));
    };

    Ok(match user_type.parse::<PrincipalKind>()? {
      PrincipalKind::Staff => NewPrincipal::Staff(NewStaff {
        name,
        institution_name: self.institution_name.unwrap_or_default(),
        profession,
        email,
        password,
      }),
      PrincipalKind::Officer => NewPrincipal::Officer(NewOfficer {
        name,
        profession,
        email,
        password,
      }),
    })
  }
}

/// `POST /signup`
pub async fn sign_up<S>(
  State(service): State<Arc<Liaison<S>>>,
  JsonBody(body): JsonBody<SignUpBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LiaisonStore + 'static,
{
  let principal = service.sign_up(body.into_new_principal()?).await?;
  Ok((StatusCode::CREATED, Json(principal)))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub message:   &'static str,
  pub user_type: PrincipalKind,
  pub token:     Token,
}

/// `POST /login`
pub async fn login<S>(
  State(service): State<Arc<Liaison<S>>>,
  JsonBody(body): JsonBody<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: LiaisonStore + 'static,
{
  let session = service.authenticate(&body.email, &body.password).await?;
  Ok(Json(LoginResponse {
    message:   "Login successful",
    user_type: session.user_type,
    token:     session.token,
  }))
}

// ─── Officer directory ────────────────────────────────────────────────────────

/// `GET /police`
pub async fn officers<S>(
  State(service): State<Arc<Liaison<S>>>,
) -> Result<Json<Vec<OfficerSummary>>, ApiError>
where
  S: LiaisonStore + 'static,
{
  Ok(Json(service.list_officers().await?))
}
