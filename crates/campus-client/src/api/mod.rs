//! REST backend client.

pub mod auth;
pub mod client;
pub mod models;
pub mod retry;

pub use client::ApiClient;
pub use models::{Event, LoginRequest, LoginResponse, NamedEntity};
pub use retry::RetryPolicy;
