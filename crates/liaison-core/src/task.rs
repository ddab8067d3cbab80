//! Investigative tasks and their completion state machine.
//!
//! A task is either [`Completion::Open`] or [`Completion::Done`]. The
//! `completed` flag and `completed_at` timestamp seen on the wire and in
//! storage are both projections of that one value, so they cannot disagree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, error::require};

// ─── State machine ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
  Open,
  Done { at: DateTime<Utc> },
}

impl Completion {
  pub fn is_complete(&self) -> bool { matches!(self, Self::Done { .. }) }

  pub fn completed_at(&self) -> Option<DateTime<Utc>> {
    match self {
      Self::Open => None,
      Self::Done { at } => Some(*at),
    }
  }

  /// Apply a request to set the completion flag.
  ///
  /// Completing an already completed task keeps its original timestamp;
  /// reopening always clears it.
  pub fn transition(self, completed: bool, now: DateTime<Utc>) -> Self {
    match (self, completed) {
      (Self::Open, true) => Self::Done { at: now },
      (done @ Self::Done { .. }, true) => done,
      (_, false) => Self::Open,
    }
  }

  /// Rebuild from the stored column pair, rejecting rows that break the
  /// flag/timestamp invariant.
  pub fn from_parts(completed: bool, completed_at: Option<DateTime<Utc>>) -> Result<Self> {
    match (completed, completed_at) {
      (false, None) => Ok(Self::Open),
      (true, Some(at)) => Ok(Self::Done { at }),
      (completed, at) => Err(Error::Store(
        format!("inconsistent task completion: completed={completed}, completed_at={at:?}").into(),
      )),
    }
  }
}

// ─── Task ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TaskRepr", try_from = "TaskRepr")]
pub struct Task {
  pub id:               i64,
  /// Id of the officer that created the task. Immutable.
  pub created_by:       i64,
  /// Free-text label naming whoever the task is assigned to. Not a reference
  /// to an officer row; any string is accepted.
  pub assigned_officer: String,
  pub description:      String,
  pub created_at:       DateTime<Utc>,
  pub completion:       Completion,
}

impl Task {
  pub fn is_complete(&self) -> bool { self.completion.is_complete() }

  pub fn completed_at(&self) -> Option<DateTime<Utc>> { self.completion.completed_at() }
}

/// Flat wire shape of a [`Task`].
#[derive(Serialize, Deserialize)]
struct TaskRepr {
  id:               i64,
  created_by:       i64,
  assigned_officer: String,
  description:      String,
  created_at:       DateTime<Utc>,
  completed:        bool,
  completed_at:     Option<DateTime<Utc>>,
}

impl From<Task> for TaskRepr {
  fn from(t: Task) -> Self {
    Self {
      id:               t.id,
      created_by:       t.created_by,
      assigned_officer: t.assigned_officer,
      description:      t.description,
      created_at:       t.created_at,
      completed:        t.completion.is_complete(),
      completed_at:     t.completion.completed_at(),
    }
  }
}

impl TryFrom<TaskRepr> for Task {
  type Error = Error;

  fn try_from(r: TaskRepr) -> Result<Self> {
    Ok(Self {
      id:               r.id,
      created_by:       r.created_by,
      assigned_officer: r.assigned_officer,
      description:      r.description,
      created_at:       r.created_at,
      completion:       Completion::from_parts(r.completed, r.completed_at)?,
    })
  }
}

/// Input for creating a task. New tasks always start [`Completion::Open`].
#[derive(Debug, Clone)]
pub struct NewTask {
  pub assigned_officer: String,
  pub description:      String,
}

impl NewTask {
  pub fn validate(&self) -> Result<()> {
    require("assigned officer", &self.assigned_officer)?;
    require("description", &self.description)
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};

  use super::*;

  fn t0() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() }

  #[test]
  fn open_to_done_stamps_now() {
    let done = Completion::Open.transition(true, t0());
    assert_eq!(done, Completion::Done { at: t0() });
    assert_eq!(done.completed_at(), Some(t0()));
  }

  #[test]
  fn completing_twice_keeps_first_timestamp() {
    let first = Completion::Open.transition(true, t0());
    let second = first.transition(true, t0() + Duration::hours(1));
    assert_eq!(first, second);
  }

  #[test]
  fn reopening_clears_timestamp() {
    let reopened = Completion::Done { at: t0() }.transition(false, t0());
    assert_eq!(reopened, Completion::Open);
    assert_eq!(reopened.completed_at(), None);
    assert_eq!(reopened.transition(false, t0()), Completion::Open);
  }

  #[test]
  fn flag_and_timestamp_agree_over_any_sequence() {
    let steps = [true, true, false, true, false, false, true];
    let mut state = Completion::Open;
    for (i, completed) in steps.into_iter().enumerate() {
      state = state.transition(completed, t0() + Duration::minutes(i as i64));
      assert_eq!(state.is_complete(), state.completed_at().is_some());
      assert_eq!(state.is_complete(), completed);
    }
  }

  #[test]
  fn inconsistent_columns_are_rejected() {
    assert!(Completion::from_parts(true, None).is_err());
    assert!(Completion::from_parts(false, Some(t0())).is_err());
    assert_eq!(Completion::from_parts(false, None).unwrap(), Completion::Open);
  }

  #[test]
  fn wire_shape_is_flat() {
    let task = Task {
      id:               1,
      created_by:       2,
      assigned_officer: "b@y.com".into(),
      description:      "patrol".into(),
      created_at:       t0(),
      completion:       Completion::Open,
    };
    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["completed"], false);
    assert!(json["completed_at"].is_null());

    let back: Task = serde_json::from_value(json).unwrap();
    assert_eq!(back, task);
  }
}
