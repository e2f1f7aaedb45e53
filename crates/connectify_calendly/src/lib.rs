// --- File: crates/connectify_calendly/src/lib.rs ---
// Declare modules within this crate
pub mod client;
pub mod doc;
pub mod error;
pub mod fields;
#[cfg(test)]
mod fields_proptest;
#[cfg(test)]
mod fields_test;
pub mod handlers;
pub mod logic;
pub mod models;
pub mod routes;
pub mod service;

pub use client::CalendlyClient;
pub use error::CalendlyError;
pub use handlers::CalendlyState;
pub use routes::{routes, routes_with_provider};
