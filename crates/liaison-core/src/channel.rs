//! Feedback and broadcast channels: append-only records attributed to the
//! principal that submitted them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  error::require,
  principal::{PrincipalKind, PrincipalRef},
};

// ─── Rating ──────────────────────────────────────────────────────────────────

/// A feedback rating, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
  pub const MIN: u8 = 1;
  pub const MAX: u8 = 5;

  pub fn new(value: i64) -> Result<Self> {
    match u8::try_from(value) {
      Ok(v) if (Self::MIN..=Self::MAX).contains(&v) => Ok(Self(v)),
      _ => Err(Error::Validation(format!(
        "rating must be between {} and {}",
        Self::MIN,
        Self::MAX
      ))),
    }
  }

  pub fn get(self) -> u8 { self.0 }
}

// ─── Feedback ────────────────────────────────────────────────────────────────

/// Feedback always has exactly one author. On the wire the author appears
/// as the same `staff_user`/`police_user` pair a [`Broadcast`] carries.
#[derive(Debug, Clone, Serialize)]
#[serde(into = "FeedbackRepr")]
pub struct Feedback {
  pub id:         i64,
  pub author:     PrincipalRef,
  pub feedback:   String,
  pub rating:     Rating,
  pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct FeedbackRepr {
  id:          i64,
  #[serde(flatten)]
  attribution: Attribution,
  feedback:    String,
  rating:      Rating,
  created_at:  DateTime<Utc>,
}

impl From<Feedback> for FeedbackRepr {
  fn from(f: Feedback) -> Self {
    Self {
      id:          f.id,
      attribution: Attribution::from_principal(f.author),
      feedback:    f.feedback,
      rating:      f.rating,
      created_at:  f.created_at,
    }
  }
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
  pub author:   PrincipalRef,
  pub feedback: String,
  pub rating:   Rating,
}

// ─── Broadcast ───────────────────────────────────────────────────────────────

/// Which principal a broadcast or feedback row is attributed to. At least one
/// is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attribution {
  pub staff_user:  Option<i64>,
  pub police_user: Option<i64>,
}

impl Attribution {
  pub fn from_principal(principal: PrincipalRef) -> Self {
    match principal.kind {
      PrincipalKind::Staff => Self { staff_user: Some(principal.id), police_user: None },
      PrincipalKind::Officer => Self { staff_user: None, police_user: Some(principal.id) },
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct Broadcast {
  pub id:          i64,
  #[serde(flatten)]
  pub attribution: Attribution,
  pub title:       String,
  pub description: String,
  pub image:       Option<String>,
  pub place:       String,
  /// When the announced event happens; may be past or future.
  pub date:        NaiveDate,
  pub created_at:  DateTime<Utc>,
}

/// Broadcast content supplied by the caller. Attribution comes from the
/// resolved token, not from here.
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastContent {
  pub title:       String,
  pub description: String,
  pub image:       Option<String>,
  pub place:       String,
  pub date:        NaiveDate,
}

impl BroadcastContent {
  pub fn validate(&self) -> Result<()> {
    require("title", &self.title)?;
    require("description", &self.description)?;
    require("place", &self.place)
  }
}

#[derive(Debug, Clone)]
pub struct NewBroadcast {
  pub attribution: Attribution,
  pub content:     BroadcastContent,
}
