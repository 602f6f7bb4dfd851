use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    Res,
    aggregate::PlaylistApi,
    config,
    management::TokenManager,
    types::{
        ArtistObject, AudioFeatures, AudioFeaturesResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, PlaylistItemObject, PlaylistItemsPage, PlaylistObject,
        PlaylistUrisRequest, PlaylistsPage, RecommendationsResponse, SavedTracksPage,
        SeveralArtistsResponse, SnapshotResponse, TrackObject,
    },
};

/// Typed Spotify Web API client backed by reqwest.
///
/// Holds the HTTP client and the token manager; every request carries a
/// freshly validated bearer token. The client itself is stateless between
/// calls and is intended for sequential use from a single task.
///
/// Each method issues exactly one request and propagates any HTTP or
/// decoding error to the caller; retry and partial-result policy live in the
/// aggregation layer.
pub struct SpotifyClient {
    http: Client,
    tokens: TokenManager,
}

impl SpotifyClient {
    pub fn new(tokens: TokenManager) -> Self {
        SpotifyClient {
            http: Client::new(),
            tokens,
        }
    }

    /// Builds a client from the token persisted by `splancli auth`.
    ///
    /// # Errors
    ///
    /// Returns an error string when no token has been saved yet or the token
    /// file cannot be parsed. Callers typically terminate with a hint to run
    /// `splancli auth`.
    pub async fn from_saved_token() -> Result<Self, String> {
        let tokens = TokenManager::load().await?;
        Ok(Self::new(tokens))
    }

    async fn get_json<T: DeserializeOwned>(&mut self, url: &str) -> Res<T> {
        let token = self.tokens.get_valid_token().await;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<T>().await?)
    }
}

impl PlaylistApi for SpotifyClient {
    async fn playlists_page(&mut self, limit: u32, offset: u32) -> Res<Vec<PlaylistObject>> {
        let api_url = format!(
            "{uri}/me/playlists?limit={limit}&offset={offset}",
            uri = &config::spotify_apiurl(),
        );

        let page = self.get_json::<PlaylistsPage>(&api_url).await?;
        Ok(page.items)
    }

    async fn saved_tracks_page(
        &mut self,
        limit: u32,
        offset: u32,
    ) -> Res<Vec<PlaylistItemObject>> {
        let api_url = format!(
            "{uri}/me/tracks?limit={limit}&offset={offset}",
            uri = &config::spotify_apiurl(),
        );

        let page = self.get_json::<SavedTracksPage>(&api_url).await?;
        Ok(page.items)
    }

    async fn playlist_items_page(
        &mut self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Res<Vec<PlaylistItemObject>> {
        let api_url = format!(
            "{uri}/playlists/{id}/tracks?limit={limit}&offset={offset}",
            uri = &config::spotify_apiurl(),
            id = playlist_id,
        );

        let page = self.get_json::<PlaylistItemsPage>(&api_url).await?;
        Ok(page.items)
    }

    async fn audio_features(&mut self, track_ids: &[String]) -> Res<Vec<Option<AudioFeatures>>> {
        let api_url = format!(
            "{uri}/audio-features?ids={ids}",
            uri = &config::spotify_apiurl(),
            ids = track_ids.join(","),
        );

        let res = self.get_json::<AudioFeaturesResponse>(&api_url).await?;
        Ok(res.audio_features)
    }

    async fn artists(&mut self, artist_ids: &[String]) -> Res<Vec<Option<ArtistObject>>> {
        let api_url = format!(
            "{uri}/artists?ids={ids}",
            uri = &config::spotify_apiurl(),
            ids = artist_ids.join(","),
        );

        let res = self.get_json::<SeveralArtistsResponse>(&api_url).await?;
        Ok(res.artists)
    }

    async fn create_playlist(
        &mut self,
        name: &str,
        description: &str,
    ) -> Res<CreatePlaylistResponse> {
        let api_url = format!(
            "{uri}/users/{user}/playlists",
            uri = &config::spotify_apiurl(),
            user = &config::spotify_user(),
        );

        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: false,
            collaborative: false,
        };

        let token = self.tokens.get_valid_token().await;
        let response = self
            .http
            .post(&api_url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<CreatePlaylistResponse>().await?)
    }

    async fn replace_playlist_items(&mut self, playlist_id: &str, uris: &[String]) -> Res<()> {
        let api_url = format!(
            "{uri}/playlists/{id}/tracks",
            uri = &config::spotify_apiurl(),
            id = playlist_id,
        );

        let body = PlaylistUrisRequest {
            uris: uris.to_vec(),
        };

        let token = self.tokens.get_valid_token().await;
        let response = self
            .http
            .put(&api_url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        response.json::<SnapshotResponse>().await?;
        Ok(())
    }

    async fn add_playlist_items(&mut self, playlist_id: &str, uris: &[String]) -> Res<()> {
        let api_url = format!(
            "{uri}/playlists/{id}/tracks",
            uri = &config::spotify_apiurl(),
            id = playlist_id,
        );

        let body = PlaylistUrisRequest {
            uris: uris.to_vec(),
        };

        let token = self.tokens.get_valid_token().await;
        let response = self
            .http
            .post(&api_url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        response.json::<SnapshotResponse>().await?;
        Ok(())
    }

    async fn recommendations(&mut self, seed_ids: &[String], limit: u32) -> Res<Vec<TrackObject>> {
        let api_url = format!(
            "{uri}/recommendations?seed_tracks={seeds}&limit={limit}",
            uri = &config::spotify_apiurl(),
            seeds = seed_ids.join(","),
        );

        let res = self.get_json::<RecommendationsResponse>(&api_url).await?;
        Ok(res.tracks)
    }
}
