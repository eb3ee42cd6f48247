pub mod account;
pub mod appointment;
pub mod auth;
pub mod availability;
pub mod doctor;
pub mod error;
pub mod patient;
