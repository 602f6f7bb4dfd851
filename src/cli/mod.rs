//! # CLI Module
//!
//! User-facing command implementations for the playlist analyzer. Each
//! command loads the persisted token, delegates the actual data work to
//! [`crate::aggregate`], and handles presentation: progress spinners,
//! tables, summary statistics, and error reporting.
//!
//! ## Commands
//!
//! - [`auth`] - Spotify OAuth 2.0 PKCE authentication flow
//! - [`list_playlists`] - Table of the user's playlists with 1-based indexes
//! - [`analyze`] - Track table, audio-feature statistics, optional JSON export
//! - [`shuffle`] - Random in-place permutation of a playlist
//! - [`duplicate_liked`] - Copy half of Liked Songs into a new playlist
//! - [`recommend`] - Track recommendations seeded from a selection
//!
//! Read commands degrade to partial output when pages or batches fail; the
//! mutating commands (`shuffle`, `duplicate`) terminate with a user-visible
//! failure message instead.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{aggregate, error, spotify::SpotifyClient, types::PlaylistSummary};

mod analyze;
mod auth;
mod duplicate;
mod playlists;
mod recommend;
mod shuffle;

pub use analyze::analyze;
pub use auth::auth;
pub use duplicate::duplicate_liked;
pub use playlists::list_playlists;
pub use recommend::recommend;
pub use shuffle::shuffle;

pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

pub(crate) async fn authenticated_client() -> SpotifyClient {
    match SpotifyClient::from_saved_token().await {
        Ok(client) => client,
        Err(e) => {
            error!(
                "Failed to load token. Please run splancli auth\n Error: {}",
                e
            );
        }
    }
}

/// Resolves a 1-based playlist number against the current listing. The
/// listing order matches what `splancli playlists` printed.
pub(crate) async fn resolve_playlist(client: &mut SpotifyClient, number: usize) -> PlaylistSummary {
    let playlists = aggregate::fetch_playlists(client).await;
    match playlists.into_iter().nth(number - 1) {
        Some(playlist) => playlist,
        None => {
            error!(
                "No playlist with number {}. Run splancli playlists to see the list.",
                number
            );
        }
    }
}
