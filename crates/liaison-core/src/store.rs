//! The `LiaisonStore` trait: everything the service needs from persistence.
//!
//! Implemented by storage backends (e.g. `liaison-store-sqlite`). The
//! service layer and the HTTP layer depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  channel::{Broadcast, Feedback, NewBroadcast, NewFeedback},
  principal::{LoginRecord, NewPrincipal, Officer, Principal, PrincipalKind},
  profile::{Coordinates, NewProfile, Profile, ProfileKey},
  task::{NewTask, Task},
};

/// How to find a principal within one kind's table. Both are exact matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
  Token(String),
  Email(String),
}

/// Abstraction over a liaison store backend.
///
/// Backends report uniqueness violations in a way that converts to
/// [`crate::Error::Conflict`]; every other failure converts to
/// [`crate::Error::Store`].
pub trait LiaisonStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static + Into<crate::Error>;

  // ── Principals ────────────────────────────────────────────────────────

  /// Persist a new principal, generating its token.
  fn register(
    &self,
    input: NewPrincipal,
  ) -> impl Future<Output = Result<Principal, Self::Error>> + Send + '_;

  /// Look up one principal of `kind`. If several rows match, the lowest id
  /// wins.
  fn find_principal(
    &self,
    kind: PrincipalKind,
    by: Lookup,
  ) -> impl Future<Output = Result<Option<Principal>, Self::Error>> + Send + '_;

  fn list_officers(&self) -> impl Future<Output = Result<Vec<Officer>, Self::Error>> + Send + '_;

  /// Append a login audit row stamped with the current time.
  fn record_login(
    &self,
    kind: PrincipalKind,
    email: String,
  ) -> impl Future<Output = Result<LoginRecord, Self::Error>> + Send + '_;

  /// All login audit rows, oldest first.
  fn list_logins(
    &self,
  ) -> impl Future<Output = Result<Vec<LoginRecord>, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  fn add_profile(
    &self,
    created_by: i64,
    input: NewProfile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  fn list_profiles(&self) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  /// Profiles matching all three attributes of `key`, by ascending id.
  fn find_profiles(
    &self,
    key: ProfileKey,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  /// Overwrite the flag reason, replace the image when `image` is `Some`, and
  /// atomically add one to the flag count. Returns `None` if `id` is unknown.
  fn flag_profile(
    &self,
    id: i64,
    reason: Option<String>,
    image: Option<String>,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Profiles whose latitude and longitude equal `at` exactly, by ascending
  /// id.
  fn profiles_at(
    &self,
    at: Coordinates,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  fn distinct_coordinates(
    &self,
  ) -> impl Future<Output = Result<Vec<Coordinates>, Self::Error>> + Send + '_;

  // ── Tasks ─────────────────────────────────────────────────────────────

  /// Persist a new, open task. `created_at` is set by the store.
  fn add_task(
    &self,
    created_by: i64,
    input: NewTask,
  ) -> impl Future<Output = Result<Task, Self::Error>> + Send + '_;

  fn tasks_created_by(
    &self,
    officer_id: i64,
  ) -> impl Future<Output = Result<Vec<Task>, Self::Error>> + Send + '_;

  /// Apply [`Completion::transition`](crate::task::Completion::transition) to
  /// task `task_id` if, and only if, it was created by `officer_id`. Read and
  /// write happen in one transaction. Returns `None` when no such task exists.
  fn set_task_completion(
    &self,
    officer_id: i64,
    task_id: i64,
    completed: bool,
  ) -> impl Future<Output = Result<Option<Task>, Self::Error>> + Send + '_;

  // ── Channels ──────────────────────────────────────────────────────────

  fn add_feedback(
    &self,
    input: NewFeedback,
  ) -> impl Future<Output = Result<Feedback, Self::Error>> + Send + '_;

  fn list_feedback(&self) -> impl Future<Output = Result<Vec<Feedback>, Self::Error>> + Send + '_;

  fn add_broadcast(
    &self,
    input: NewBroadcast,
  ) -> impl Future<Output = Result<Broadcast, Self::Error>> + Send + '_;

  /// Broadcasts ordered by event date, latest first.
  fn list_broadcasts(
    &self,
  ) -> impl Future<Output = Result<Vec<Broadcast>, Self::Error>> + Send + '_;
}
