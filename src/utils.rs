use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Local};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// A playlist chosen on the command line: a 1-based index into the listing
/// printed by `splancli playlists`, or the literal sentinel for the user's
/// Liked Songs library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Liked,
    Index(usize),
}

pub fn parse_selection(input: &str) -> Result<Selection, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("selection cannot be empty".to_string());
    }

    let lowered = trimmed.to_lowercase();
    if lowered == "l" || lowered == "liked" {
        return Ok(Selection::Liked);
    }

    match trimmed.parse::<usize>() {
        Ok(0) => Err("playlist numbers start at 1".to_string()),
        Ok(n) => Ok(Selection::Index(n)),
        Err(_) => Err(format!(
            "invalid selection '{}': expected a playlist number or 'liked'",
            trimmed
        )),
    }
}

/// Strips a Spotify URI down to its bare identifier, e.g.
/// `spotify:track:abc123` -> `abc123`. Bare identifiers pass through.
pub fn id_from_uri(uri: &str) -> &str {
    uri.rsplit(':').next().unwrap_or(uri)
}

pub fn format_duration(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    format!("{}:{:02}", minutes, seconds)
}

pub fn analysis_filename(now: DateTime<Local>) -> String {
    format!("analysis_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// The first ceil(n/2) elements, in order. Used when duplicating half of the
/// liked-tracks library.
pub fn first_half<T>(items: &[T]) -> &[T] {
    &items[..items.len().div_ceil(2)]
}
