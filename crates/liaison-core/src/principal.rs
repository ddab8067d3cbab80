//! Principals: the two disjoint kinds of actor that can authenticate.
//!
//! Staff and officers live in separate tables but are handled through the
//! single [`Principal`] union so that token resolution is one lookup.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  error::{require, require_email},
};

// ─── Token ───────────────────────────────────────────────────────────────────

/// Opaque bearer credential. Generated once when a principal is first
/// persisted and never regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
  pub fn generate() -> Self { Self(Uuid::new_v4().to_string()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl From<String> for Token {
  fn from(s: String) -> Self { Self(s) }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Kind ────────────────────────────────────────────────────────────────────

/// Which table a principal lives in. The wire tag for officers is `police`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrincipalKind {
  #[serde(rename = "staff")]
  Staff,
  #[serde(rename = "police")]
  Officer,
}

impl PrincipalKind {
  /// Resolution order used by both the token resolver and the
  /// credential authenticator.
  pub const LOOKUP_ORDER: [PrincipalKind; 2] = [Self::Staff, Self::Officer];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Staff => "staff",
      Self::Officer => "police",
    }
  }
}

impl fmt::Display for PrincipalKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for PrincipalKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "staff" => Ok(Self::Staff),
      "police" => Ok(Self::Officer),
      _ => Err(Error::validation("invalid user type")),
    }
  }
}

// ─── Principals ──────────────────────────────────────────────────────────────

/// A college administrator.
#[derive(Debug, Clone, Serialize)]
pub struct Staff {
  pub id:               i64,
  pub name:             String,
  pub institution_name: String,
  pub profession:       String,
  pub email:            String,
  /// Stored and compared as plain text.
  #[serde(skip_serializing)]
  pub password:         String,
  pub token:            Token,
}

/// A police officer.
#[derive(Debug, Clone, Serialize)]
pub struct Officer {
  pub id:         i64,
  pub name:       String,
  pub profession: String,
  pub email:      String,
  #[serde(skip_serializing)]
  pub password:   String,
  pub token:      Token,
}

/// An authenticated actor of either kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "user_type")]
pub enum Principal {
  #[serde(rename = "staff")]
  Staff(Staff),
  #[serde(rename = "police")]
  Officer(Officer),
}

impl Principal {
  pub fn kind(&self) -> PrincipalKind {
    match self {
      Self::Staff(_) => PrincipalKind::Staff,
      Self::Officer(_) => PrincipalKind::Officer,
    }
  }

  pub fn id(&self) -> i64 {
    match self {
      Self::Staff(s) => s.id,
      Self::Officer(o) => o.id,
    }
  }

  pub fn email(&self) -> &str {
    match self {
      Self::Staff(s) => &s.email,
      Self::Officer(o) => &o.email,
    }
  }

  pub fn token(&self) -> &Token {
    match self {
      Self::Staff(s) => &s.token,
      Self::Officer(o) => &o.token,
    }
  }

  /// Plain string equality against the stored password.
  pub fn password_matches(&self, candidate: &str) -> bool {
    let stored = match self {
      Self::Staff(s) => &s.password,
      Self::Officer(o) => &o.password,
    };
    stored == candidate
  }

  pub fn reference(&self) -> PrincipalRef {
    PrincipalRef { kind: self.kind(), id: self.id() }
  }
}

/// A pointer to a principal row: kind plus id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrincipalRef {
  pub kind: PrincipalKind,
  pub id:   i64,
}

/// Public directory entry for an officer. Never carries credentials.
#[derive(Debug, Clone, Serialize)]
pub struct OfficerSummary {
  pub id:         i64,
  pub name:       String,
  pub profession: String,
  pub email:      String,
}

impl From<Officer> for OfficerSummary {
  fn from(o: Officer) -> Self {
    Self { id: o.id, name: o.name, profession: o.profession, email: o.email }
  }
}

// ─── Registration ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct NewStaff {
  pub name:             String,
  pub institution_name: String,
  pub profession:       String,
  pub email:            String,
  pub password:         String,
}

#[derive(Debug, Clone)]
pub struct NewOfficer {
  pub name:       String,
  pub profession: String,
  pub email:      String,
  pub password:   String,
}

/// Sign-up input. The token is not part of it: the store generates one.
#[derive(Debug, Clone)]
pub enum NewPrincipal {
  Staff(NewStaff),
  Officer(NewOfficer),
}

impl NewPrincipal {
  pub fn validate(&self) -> Result<()> {
    let (name, profession, email, password) = match self {
      Self::Staff(s) => {
        require("institution name", &s.institution_name)?;
        (&s.name, &s.profession, &s.email, &s.password)
      }
      Self::Officer(o) => (&o.name, &o.profession, &o.email, &o.password),
    };
    require("name", name)?;
    require("profession", profession)?;
    require_email("email", email)?;
    require("password", password)
  }
}

// ─── Audit ───────────────────────────────────────────────────────────────────

/// One successful credential authentication. Rows are append-only.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRecord {
  pub id:         i64,
  pub user_type:  PrincipalKind,
  pub email:      String,
  pub login_time: DateTime<Utc>,
}

/// What a successful login hands back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
  pub user_type: PrincipalKind,
  pub token:     Token,
}
