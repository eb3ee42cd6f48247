pub mod auth;

pub use auth::{bootstrap_admin, AuthService};
