pub mod memory;
pub mod postgrest;
pub mod repositories;
pub mod state;
pub mod supabase;

pub use state::{AppState, ClinicStore};
