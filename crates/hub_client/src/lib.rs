//! Table backend API client.
//!
//! This crate is the single source of truth for the backend wire contract:
//! list tables, fetch, save, share, download.
//!
//! No UI concepts. No retries. Failures carry the server's message.

mod auth;
mod client;

pub use auth::{AuthCredentials, auth_file_path, load_auth, load_auth_from, save_auth, save_auth_to, delete_auth};
pub use client::{HubClient, HubError};
