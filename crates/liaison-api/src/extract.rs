//! Request extractors that report decoding failures as [`ApiError`], and
//! bearer-token lookup.

use axum::{
  extract::{FromRequest, FromRequestParts},
  http::{HeaderMap, header},
};

use crate::error::ApiError;

/// `axum::Json` with rejections rendered as a 400 `{"error": ..}` body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Query` with rejections rendered as a 400 `{"error": ..}`
/// body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// The caller's token: an explicit `token` field if one was sent, otherwise
/// the `Authorization: Token <t>` or `Authorization: Bearer <t>` header.
///
/// Returns an empty string when neither is present; the service rejects that
/// as a missing token.
pub fn bearer_token(headers: &HeaderMap, explicit: Option<String>) -> String {
  if let Some(token) = explicit.filter(|t| !t.trim().is_empty()) {
    return token;
  }

  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .map(|v| {
      v.strip_prefix("Token ")
        .or_else(|| v.strip_prefix("Bearer "))
        .unwrap_or(v)
        .trim()
        .to_owned()
    })
    .unwrap_or_default()
}
