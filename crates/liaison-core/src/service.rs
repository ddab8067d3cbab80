//! [`Liaison`]: every externally visible operation, over any
//! [`LiaisonStore`].
//!
//! Token resolution happens here and gates every mutation. Storage errors
//! are converted into [`Error`] and otherwise passed through untouched.

use tracing::{info, warn};

use crate::{
  Error, Result,
  channel::{Attribution, Broadcast, BroadcastContent, Feedback, NewBroadcast, NewFeedback, Rating},
  error::require,
  principal::{
    NewPrincipal, Officer, OfficerSummary, Principal, PrincipalKind, Session, Staff,
  },
  profile::{Coordinates, Flag, NewProfile, Profile, ProfileKey},
  store::{LiaisonStore, Lookup},
  task::{NewTask, Task},
};

/// Converts a backend result into the core error taxonomy.
trait IntoCore<T> {
  fn into_core(self) -> Result<T>;
}

impl<T, E: Into<Error>> IntoCore<T> for std::result::Result<T, E> {
  fn into_core(self) -> Result<T> { self.map_err(Into::into) }
}

/// The liaison service. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Liaison<S> {
  store: S,
}

impl<S: LiaisonStore> Liaison<S> {
  pub fn new(store: S) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  // ─── Identity ──────────────────────────────────────────────────────────────

  /// Register a staff member or officer. The returned principal carries its
  /// freshly generated token.
  pub async fn sign_up(&self, input: NewPrincipal) -> Result<Principal> {
    input.validate()?;
    let principal = self.store.register(input).await.into_core()?;
    info!(
      user_type = %principal.kind(),
      id = principal.id(),
      email = principal.email(),
      "principal registered"
    );
    Ok(principal)
  }

  pub async fn list_officers(&self) -> Result<Vec<OfficerSummary>> {
    let officers = self.store.list_officers().await.into_core()?;
    Ok(officers.into_iter().map(OfficerSummary::from).collect())
  }

  /// Resolve a bearer token to a principal of either kind. Staff are checked
  /// first, then officers.
  pub async fn resolve(&self, token: &str) -> Result<Principal> {
    require("token", token)?;
    for kind in PrincipalKind::LOOKUP_ORDER {
      let found = self
        .store
        .find_principal(kind, Lookup::Token(token.to_owned()))
        .await
        .into_core()?;
      if let Some(principal) = found {
        return Ok(principal);
      }
    }
    warn!("rejected unknown token");
    Err(Error::unauthorized("invalid token"))
  }

  pub async fn resolve_staff(&self, token: &str) -> Result<Staff> {
    match self.resolve(token).await? {
      Principal::Staff(staff) => Ok(staff),
      Principal::Officer(officer) => {
        warn!(officer = officer.id, "officer token used for a staff operation");
        Err(Error::unauthorized("token does not belong to a staff user"))
      }
    }
  }

  pub async fn resolve_officer(&self, token: &str) -> Result<Officer> {
    match self.resolve(token).await? {
      Principal::Officer(officer) => Ok(officer),
      Principal::Staff(staff) => {
        warn!(staff = staff.id, "staff token used for a police operation");
        Err(Error::unauthorized("token does not belong to a police user"))
      }
    }
  }

  /// Check an email/password pair against staff, then officers. Success
  /// appends a login record and returns the principal's token.
  pub async fn authenticate(&self, email: &str, password: &str) -> Result<Session> {
    require("email", email)?;
    require("password", password)?;

    for kind in PrincipalKind::LOOKUP_ORDER {
      let found = self
        .store
        .find_principal(kind, Lookup::Email(email.to_owned()))
        .await
        .into_core()?;

      if let Some(principal) = found
        && principal.password_matches(password)
      {
        self
          .store
          .record_login(kind, principal.email().to_owned())
          .await
          .into_core()?;
        info!(user_type = %kind, email, "login succeeded");
        return Ok(Session { user_type: kind, token: principal.token().clone() });
      }
    }

    warn!(email, "login failed");
    Err(Error::InvalidCredentials)
  }

  // ─── Profiles ──────────────────────────────────────────────────────────────

  pub async fn create_profile(&self, staff_token: &str, input: NewProfile) -> Result<Profile> {
    let staff = self.resolve_staff(staff_token).await?;
    input.validate()?;
    let profile = self.store.add_profile(staff.id, input).await.into_core()?;
    info!(profile = profile.id, staff = staff.id, "profile created");
    Ok(profile)
  }

  pub async fn list_profiles(&self) -> Result<Vec<Profile>> {
    self.store.list_profiles().await.into_core()
  }

  /// Exact match on name, registration number and institution.
  pub async fn find_profile(&self, key: ProfileKey) -> Result<Profile> {
    key.validate()?;
    let mut matches = self.store.find_profiles(key).await.into_core()?;
    match matches.len() {
      0 => Err(Error::not_found("user profile not found with the provided details")),
      1 => Ok(matches.remove(0)),
      n => Err(Error::Conflict(format!("{n} user profiles match the provided details"))),
    }
  }

  /// Record a flag against the profile identified by `flag.key`. Every call
  /// increments the flag count, even with an identical reason.
  pub async fn flag_profile(&self, flag: Flag) -> Result<Profile> {
    let target = self.find_profile(flag.key.clone()).await?;
    let image = flag.replacement_image().map(str::to_owned);
    let profile = self
      .store
      .flag_profile(target.id, flag.reason, image)
      .await
      .into_core()?
      .ok_or_else(|| Error::not_found("user profile not found with the provided details"))?;
    info!(profile = profile.id, flag_count = profile.flag_count, "profile flagged");
    Ok(profile)
  }

  /// Exact string match on both coordinates. When several profiles share the
  /// pair, the one with the lowest id is returned.
  pub async fn find_profile_at(&self, at: Coordinates) -> Result<Profile> {
    require("latitude", at.latitude.as_deref().unwrap_or_default())?;
    require("longitude", at.longitude.as_deref().unwrap_or_default())?;
    self
      .store
      .profiles_at(at)
      .await
      .into_core()?
      .into_iter()
      .next()
      .ok_or_else(|| Error::not_found("no user found with the provided latitude and longitude"))
  }

  pub async fn distinct_coordinates(&self) -> Result<Vec<Coordinates>> {
    self.store.distinct_coordinates().await.into_core()
  }

  // ─── Tasks ─────────────────────────────────────────────────────────────────

  pub async fn create_task(&self, officer_token: &str, input: NewTask) -> Result<Task> {
    let officer = self.resolve_officer(officer_token).await?;
    input.validate()?;
    let task = self.store.add_task(officer.id, input).await.into_core()?;
    info!(task = task.id, officer = officer.id, "task created");
    Ok(task)
  }

  /// Tasks created by the token's officer, and no one else's.
  pub async fn tasks_for_owner(&self, officer_token: &str) -> Result<Vec<Task>> {
    let officer = self.resolve_officer(officer_token).await?;
    self.store.tasks_created_by(officer.id).await.into_core()
  }

  pub async fn set_task_completion(
    &self,
    officer_token: &str,
    task_id: i64,
    completed: bool,
  ) -> Result<Task> {
    let officer = self.resolve_officer(officer_token).await?;
    let task = self
      .store
      .set_task_completion(officer.id, task_id, completed)
      .await
      .into_core()?
      .ok_or_else(|| Error::NotFound(format!("task {task_id} not found")))?;
    info!(task = task.id, completed = task.is_complete(), "task completion set");
    Ok(task)
  }

  // ─── Channels ──────────────────────────────────────────────────────────────

  pub async fn submit_feedback(&self, token: &str, text: &str, rating: i64) -> Result<Feedback> {
    let author = self.resolve(token).await?.reference();
    require("feedback", text)?;
    let rating = Rating::new(rating)?;
    self
      .store
      .add_feedback(NewFeedback { author, feedback: text.to_owned(), rating })
      .await
      .into_core()
  }

  pub async fn list_feedback(&self) -> Result<Vec<Feedback>> {
    self.store.list_feedback().await.into_core()
  }

  pub async fn create_broadcast(&self, token: &str, content: BroadcastContent) -> Result<Broadcast> {
    let principal = self.resolve(token).await?;
    content.validate()?;
    let attribution = Attribution::from_principal(principal.reference());
    let broadcast = self
      .store
      .add_broadcast(NewBroadcast { attribution, content })
      .await
      .into_core()?;
    info!(broadcast = broadcast.id, user_type = %principal.kind(), "broadcast created");
    Ok(broadcast)
  }

  pub async fn list_broadcasts(&self) -> Result<Vec<Broadcast>> {
    self.store.list_broadcasts().await.into_core()
  }
}
