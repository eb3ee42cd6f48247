//! Typed HTTP client for the clinic API.
//!
//! Authentication is explicit: the `login_*` and `register_*` calls return a
//! [`Session`], and every protected call borrows one.

pub mod appointments;
pub mod auth;
pub mod client;
pub mod doctors;
pub mod error;
pub mod patients;

pub use client::{ClinicClient, Session};
pub use error::ClientError;
