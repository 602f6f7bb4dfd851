//! # API Module
//!
//! HTTP endpoints for the local callback server used during authentication.
//!
//! - [`callback`] - Handles the OAuth callback from Spotify's authorization
//!   server and completes the PKCE flow by exchanging the authorization code
//!   for an access token.
//! - [`health`] - Health check returning application status and version.
//!
//! Built on [Axum](https://docs.rs/axum); each endpoint is an async handler
//! wired up by [`crate::server::start_api_server`].

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
