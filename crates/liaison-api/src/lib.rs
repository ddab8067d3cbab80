//! JSON REST API for the campus liaison service.
//!
//! Exposes an axum [`Router`] backed by a [`Liaison`] service over any
//! [`LiaisonStore`]. TLS and listener setup are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = liaison_api::api_router(Arc::new(Liaison::new(store)));
//! axum::serve(listener, app).await?;
//! ```

pub mod accounts;
pub mod channels;
pub mod error;
pub mod extract;
pub mod profiles;
pub mod tasks;

use std::sync::Arc;

use axum::{
  Router,
  routing::{MethodRouter, get, post, put},
};
use liaison_core::{Liaison, store::LiaisonStore};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build the full API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<Liaison<S>>) -> Router<()>
where
  S: LiaisonStore + 'static,
{
  Router::new()
    .route_both("/test", get(accounts::ping))
    // Identity
    .route_both("/signup", post(accounts::sign_up::<S>))
    .route_both("/login", post(accounts::login::<S>))
    .route_both("/police", get(accounts::officers::<S>))
    // Profiles
    .route_both("/userprofiles", get(profiles::list::<S>))
    .route_both("/userprofiles/create", post(profiles::create::<S>))
    .route_both("/student-profile", get(profiles::by_identity::<S>))
    .route_both("/redflag", post(profiles::flag::<S>))
    .route_both("/latlongs", get(profiles::coordinates::<S>))
    .route_both("/profile_by_latlong", get(profiles::by_coordinates::<S>))
    // Tasks
    .route_both("/tasks", get(tasks::list::<S>))
    .route_both("/tasks/create", post(tasks::create::<S>))
    .route_both("/tasks/update/{id}", put(tasks::update::<S>))
    // Channels
    .route_both("/feedback", get(channels::list_feedback::<S>))
    .route_both("/feedback/create", post(channels::submit_feedback::<S>))
    .route_both("/broadcast", get(channels::list_broadcasts::<S>))
    .route_both("/broadcast/create", post(channels::create_broadcast::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(service)
}

/// Mounts every route with and without a trailing slash; the mobile clients
/// call `/tasks/`, `/redflag/` and so on.
trait RouteBoth<S> {
  fn route_both(self, path: &str, method_router: MethodRouter<S>) -> Self;
}

impl<S> RouteBoth<S> for Router<S>
where
  S: Clone + Send + Sync + 'static,
{
  fn route_both(self, path: &str, method_router: MethodRouter<S>) -> Self {
    self
      .route(&format!("{path}/"), method_router.clone())
      .route(path, method_router)
  }
}

#[cfg(test)]
mod tests;
