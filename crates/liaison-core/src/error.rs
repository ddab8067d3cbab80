//! Error taxonomy shared by every liaison operation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field is missing or malformed.
  #[error("{0}")]
  Validation(String),

  /// The token resolved to nothing, or to the wrong principal kind.
  #[error("{0}")]
  Unauthorized(String),

  #[error("invalid email or password")]
  InvalidCredentials,

  #[error("{0}")]
  NotFound(String),

  /// A uniqueness constraint was violated, or a lookup that must be unique
  /// matched several rows.
  #[error("{0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }

  pub fn unauthorized(msg: impl Into<String>) -> Self { Self::Unauthorized(msg.into()) }

  pub fn not_found(msg: impl Into<String>) -> Self { Self::NotFound(msg.into()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Fail with [`Error::Validation`] if `value` is empty or whitespace.
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::Validation(format!("{field} is required")));
  }
  Ok(())
}

/// Cheap shape check mirroring what an email form field accepts: something on
/// both sides of a single `@`, and a dot in the domain.
pub(crate) fn require_email(field: &str, value: &str) -> Result<()> {
  require(field, value)?;
  let well_formed = value
    .split_once('@')
    .is_some_and(|(local, domain)| {
      !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
    });
  if !well_formed {
    return Err(Error::Validation(format!("{field} is not a valid email address")));
  }
  Ok(())
}
