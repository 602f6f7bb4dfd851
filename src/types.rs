use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// One playlist as returned by the listing endpoint. Constructed fresh per
/// listing call, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub track_count: u32,
    pub owner: Option<String>,
    pub public: Option<bool>,
    pub collaborative: bool,
    pub image_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// One track with its provenance and resolved genre tags. `uri` and `id`
/// always refer to the same underlying track; `genres` is sorted and
/// deduplicated.
#[derive(Debug, Clone, Serialize)]
pub struct TrackRecord {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub artist_id: String,
    pub album: String,
    pub duration_ms: u64,
    pub popularity: u32,
    pub added_at: Option<String>,
    pub genres: Vec<String>,
    pub uri: String,
}

/// Numeric audio descriptors for one track, within Spotify's documented
/// ranges. Absence of a record is a valid "unknown" state, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub danceability: f64,
    pub energy: f64,
    pub key: i32,
    pub loudness: f64,
    pub mode: i32,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub valence: f64,
    pub tempo: f64,
    pub time_signature: i32,
}

// --- wire types, validated at the boundary ---------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistsPage {
    pub items: Vec<PlaylistObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistObject {
    pub id: String,
    pub name: String,
    pub owner: Option<OwnerObject>,
    pub public: Option<bool>,
    #[serde(default)]
    pub collaborative: bool,
    pub images: Option<Vec<ImageObject>>,
    pub tracks: TrackTotals,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerObject {
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageObject {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackTotals {
    pub total: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedTracksPage {
    pub items: Vec<PlaylistItemObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemsPage {
    pub items: Vec<PlaylistItemObject>,
}

/// One playlist/library item. `track` is null for tracks that were removed
/// from the catalog but are still referenced by playlist position.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemObject {
    pub added_at: Option<String>,
    pub track: Option<TrackObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackObject {
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    pub duration_ms: u64,
    pub popularity: Option<u32>,
    pub artists: Vec<ArtistRef>,
    pub album: AlbumRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRef {
    pub name: String,
}

/// Batched audio-features lookup. Entries are positional with respect to the
/// requested ids; unresolvable ids come back as null.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<AudioFeatures>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeveralArtistsResponse {
    pub artists: Vec<Option<ArtistObject>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistObject {
    pub id: String,
    pub name: String,
    pub genres: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsResponse {
    pub tracks: Vec<TrackObject>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistUrisRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

// --- table rows ------------------------------------------------------------

#[derive(Tabled)]
pub struct PlaylistTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub name: String,
    pub owner: String,
    pub tracks: u32,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub name: String,
    pub artist: String,
    pub album: String,
    pub added: String,
    pub duration: String,
    pub popularity: u32,
    pub genres: String,
}

impl From<PlaylistObject> for PlaylistSummary {
    fn from(p: PlaylistObject) -> Self {
        PlaylistSummary {
            id: p.id,
            name: p.name,
            track_count: p.tracks.total,
            owner: p.owner.and_then(|o| o.display_name),
            public: p.public,
            collaborative: p.collaborative,
            image_url: p
                .images
                .and_then(|imgs| imgs.into_iter().next().map(|i| i.url)),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl TrackRecord {
    /// Builds a record from a raw track payload. Missing optional fields are
    /// nulled out here rather than erroring deep inside an aggregation loop.
    pub fn from_track(track: TrackObject, added_at: Option<String>, genres: Vec<String>) -> Self {
        let artist = track
            .artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_default();
        let artist_id = track
            .artists
            .first()
            .and_then(|a| a.id.clone())
            .unwrap_or_default();

        TrackRecord {
            id: track.id.unwrap_or_default(),
            name: track.name,
            artist,
            artist_id,
            album: track.album.name,
            duration_ms: track.duration_ms,
            popularity: track.popularity.unwrap_or(0),
            added_at,
            genres,
            uri: track.uri,
        }
    }
}
