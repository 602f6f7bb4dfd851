//! # Spotify Integration Module
//!
//! This module is the HTTP layer between the analyzer and the Spotify Web
//! API. It implements the OAuth 2.0 PKCE authentication flow and a thin
//! typed client with one method per REST endpoint the aggregation layer
//! consumes.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI)
//!          ↓
//! Aggregation Layer (paginate / batch / merge)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 PKCE)
//!     └── Typed endpoint client (SpotifyClient)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - The complete PKCE flow: verifier/challenge generation,
//!   browser launch, local callback server, token exchange and persistence.
//! - [`client`] - [`SpotifyClient`], the [`crate::aggregate::PlaylistApi`]
//!   implementation backed by reqwest. Each method issues exactly one
//!   request; there is no retry, backoff, or caching at this layer. A failed
//!   call is propagated to the aggregation layer, which decides whether to
//!   stop a pagination loop or skip a batch.
//!
//! ## API Coverage
//!
//! - `GET /me/playlists` - Paginated playlist listing
//! - `GET /me/tracks` - Paginated saved-tracks (liked) listing
//! - `GET /playlists/{id}/tracks` - Paginated playlist items
//! - `GET /audio-features` - Batched audio-feature lookup (≤100 ids)
//! - `GET /artists` - Batched artist lookup (≤50 ids)
//! - `GET /recommendations` - Track-seeded recommendations (≤5 seeds)
//! - `POST /users/{user_id}/playlists` - Create a playlist
//! - `PUT /playlists/{id}/tracks` - Replace playlist items
//! - `POST /playlists/{id}/tracks` - Append playlist items
//! - `POST /api/token` - Token exchange and refresh
//!
//! ## Error Types
//!
//! Endpoint methods return [`crate::Res`]; authentication helpers return
//! `Result<_, String>` or `reqwest::Error` where the caller terminates with
//! a user-facing message.

pub mod auth;
pub mod client;

pub use client::SpotifyClient;
