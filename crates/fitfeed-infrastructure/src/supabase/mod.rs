//! Clients for the hosted auth and data backend.

mod auth_client;
mod client;
mod rest_client;

pub use auth_client::SupabaseAuthClient;
pub use client::SupabaseClient;
pub use rest_client::SupabaseRestClient;
