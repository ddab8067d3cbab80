//! Core types, the storage trait, and the service operations of the campus
//! liaison backend.
//!
//! This crate is free of HTTP and database dependencies. Storage backends
//! implement [`store::LiaisonStore`]; transports drive [`service::Liaison`].

pub mod channel;
pub mod error;
pub mod principal;
pub mod profile;
pub mod service;
pub mod store;
pub mod task;

pub use error::{Error, Result};
pub use service::Liaison;
