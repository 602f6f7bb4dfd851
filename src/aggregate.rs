//! Paginated, batch-oriented aggregation over the Spotify Web API.
//!
//! This module assembles playlist, track, and audio-feature collections by
//! stitching together paginated list endpoints and batched lookup endpoints:
//! audio features in batches of up to 100 ids, artist details in batches of
//! up to 50, with artist ids deduplicated per page before any genre lookup.
//!
//! All operations are plain functions of `(api, inputs)`; nothing here
//! carries state across calls, caches responses, or issues concurrent
//! requests. Requests run strictly one at a time.
//!
//! Error handling is uniform: a failed page stops the pagination loop and a
//! failed batch is skipped, in both cases keeping whatever was already
//! accumulated. Partial results are first-class; callers must not treat a
//! short result as failure. The mutating operations (`shuffle_playlist`,
//! `duplicate_liked_half`) are the exception and propagate their errors so
//! the CLI can surface them.
//!
//! The [`PlaylistApi`] trait is the seam between this module and HTTP:
//! [`crate::spotify::SpotifyClient`] implements it with reqwest, and the
//! integration tests implement it with an in-memory mock.

use std::collections::{BTreeSet, HashMap, HashSet};

use rand::seq::SliceRandom;

use crate::{
    Res, info,
    types::{
        ArtistObject, AudioFeatures, CreatePlaylistResponse, PlaylistItemObject, PlaylistObject,
        PlaylistSummary, TrackObject, TrackRecord,
    },
    utils, warning,
};

/// Page size for the playlist and saved-tracks listing endpoints.
pub const LIST_PAGE_SIZE: u32 = 50;
/// Page size for the playlist-items endpoint.
pub const TRACK_PAGE_SIZE: u32 = 100;
/// Spotify's limit for the audio-features endpoint.
pub const FEATURE_BATCH_SIZE: usize = 100;
/// Spotify's limit for the several-artists endpoint.
pub const ARTIST_BATCH_SIZE: usize = 50;
/// Spotify's limit on recommendation seeds.
pub const MAX_RECOMMENDATION_SEEDS: usize = 5;
/// Spotify's limit on uris per playlist write call.
pub const WRITE_CHUNK_SIZE: usize = 100;

/// The external service surface the aggregation layer consumes. One method
/// per remote endpoint; authentication and token refresh are entirely the
/// implementor's concern.
#[allow(async_fn_in_trait)]
pub trait PlaylistApi {
    async fn playlists_page(&mut self, limit: u32, offset: u32) -> Res<Vec<PlaylistObject>>;

    async fn saved_tracks_page(&mut self, limit: u32, offset: u32)
    -> Res<Vec<PlaylistItemObject>>;

    async fn playlist_items_page(
        &mut self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Res<Vec<PlaylistItemObject>>;

    /// Batched audio-features lookup. The result is positional with respect
    /// to `track_ids`, with `None` in place of any id the service could not
    /// resolve.
    async fn audio_features(&mut self, track_ids: &[String]) -> Res<Vec<Option<AudioFeatures>>>;

    async fn artists(&mut self, artist_ids: &[String]) -> Res<Vec<Option<ArtistObject>>>;

    async fn create_playlist(
        &mut self,
        name: &str,
        description: &str,
    ) -> Res<CreatePlaylistResponse>;

    async fn replace_playlist_items(&mut self, playlist_id: &str, uris: &[String]) -> Res<()>;

    async fn add_playlist_items(&mut self, playlist_id: &str, uris: &[String]) -> Res<()>;

    async fn recommendations(&mut self, seed_ids: &[String], limit: u32) -> Res<Vec<TrackObject>>;
}

/// Walks an offset/limit paginated endpoint until it returns a short or
/// empty page. Pages are kept separate so page-scoped joins (the per-page
/// artist-genre lookup) keep their boundaries.
///
/// A page failure is logged and stops the walk; pages accumulated up to that
/// point are returned.
pub async fn paginate<T, F>(page_size: u32, mut fetch: F) -> Vec<Vec<T>>
where
    F: AsyncFnMut(u32, u32) -> Res<Vec<T>>,
{
    let mut pages = Vec::new();
    let mut offset = 0;

    loop {
        match fetch(page_size, offset).await {
            Ok(items) => {
                let count = items.len();
                if count == 0 {
                    break;
                }

                pages.push(items);

                if (count as u32) < page_size {
                    break;
                }
                offset += page_size;
            }
            Err(e) => {
                warning!("Stopping pagination at offset {}: {}", offset, e);
                break;
            }
        }
    }

    pages
}

/// Runs `call` once per fixed-size chunk of `input`, in input order, handing
/// each successful result to `merge` together with the chunk that produced
/// it. A failed chunk is logged and skipped; later chunks still execute.
pub async fn batched<T, R, F, M>(input: &[T], batch_size: usize, mut call: F, mut merge: M)
where
    F: AsyncFnMut(&[T]) -> Res<R>,
    M: FnMut(&[T], R),
{
    for chunk in input.chunks(batch_size) {
        match call(chunk).await {
            Ok(result) => merge(chunk, result),
            Err(e) => warning!("Skipping batch of {} items: {}", chunk.len(), e),
        }
    }
}

/// Fetches all of the user's playlists, in server-returned order. Returns
/// whatever was accumulated if a page fails.
pub async fn fetch_playlists(api: &mut impl PlaylistApi) -> Vec<PlaylistSummary> {
    let pages = paginate(LIST_PAGE_SIZE, async |limit, offset| {
        api.playlists_page(limit, offset).await
    })
    .await;

    pages
        .into_iter()
        .flatten()
        .map(PlaylistSummary::from)
        .collect()
}

/// Fetches the user's liked tracks as bare uris, in library order.
pub async fn fetch_liked_track_uris(api: &mut impl PlaylistApi) -> Vec<String> {
    let pages = paginate(LIST_PAGE_SIZE, async |limit, offset| {
        api.saved_tracks_page(limit, offset).await
    })
    .await;

    pages
        .into_iter()
        .flatten()
        .filter_map(|item| item.track.map(|t| t.uri))
        .collect()
}

/// Fetches the user's liked tracks as full records. The library-wide
/// collection has no playlist provenance, so `added_at` is `None` and genres
/// are left unresolved; the genre join is a playlist-fetch behavior.
pub async fn fetch_liked_tracks(api: &mut impl PlaylistApi) -> Vec<TrackRecord> {
    let pages = paginate(LIST_PAGE_SIZE, async |limit, offset| {
        api.saved_tracks_page(limit, offset).await
    })
    .await;

    pages
        .into_iter()
        .flatten()
        .filter_map(|item| item.track)
        .map(|track| TrackRecord::from_track(track, None, Vec::new()))
        .collect()
}

/// Fetches all uris of a playlist, in playlist order. Items whose track
/// payload is null are skipped.
pub async fn fetch_playlist_track_uris(
    api: &mut impl PlaylistApi,
    playlist_id: &str,
) -> Vec<String> {
    let pages = paginate(TRACK_PAGE_SIZE, async |limit, offset| {
        api.playlist_items_page(playlist_id, limit, offset).await
    })
    .await;

    pages
        .into_iter()
        .flatten()
        .filter_map(|item| item.track.map(|t| t.uri))
        .collect()
}

/// Fetches a playlist's tracks with "added at" provenance and resolved genre
/// tags, in playlist order.
///
/// Per page: the distinct artist ids referenced by that page's tracks are
/// collected once, a single genre lookup is issued for them, and each
/// track's genres become the sorted, deduplicated union of its artists'
/// genres. Items whose track payload is null (removed from the catalog but
/// still referenced by playlist position) are skipped silently.
pub async fn fetch_playlist_tracks(
    api: &mut impl PlaylistApi,
    playlist_id: &str,
) -> Vec<TrackRecord> {
    let pages = paginate(TRACK_PAGE_SIZE, async |limit, offset| {
        api.playlist_items_page(playlist_id, limit, offset).await
    })
    .await;

    let mut tracks = Vec::new();

    for page in pages {
        // One genre lookup per page, ids deduplicated across the page.
        let mut seen = HashSet::new();
        let mut artist_ids = Vec::new();
        for item in &page {
            if let Some(track) = &item.track {
                for artist in &track.artists {
                    if let Some(id) = &artist.id {
                        if seen.insert(id.clone()) {
                            artist_ids.push(id.clone());
                        }
                    }
                }
            }
        }

        let artist_genres = fetch_artist_genres(api, &artist_ids).await;

        for item in page {
            let Some(track) = item.track else {
                continue;
            };

            let mut genres = BTreeSet::new();
            for artist in &track.artists {
                if let Some(id) = &artist.id {
                    if let Some(g) = artist_genres.get(id) {
                        genres.extend(g.iter().cloned());
                    }
                }
            }

            tracks.push(TrackRecord::from_track(
                track,
                item.added_at,
                genres.into_iter().collect(),
            ));
        }
    }

    tracks
}

/// Fetches audio features for the given track uris, batching at most
/// [`FEATURE_BATCH_SIZE`] ids per call and re-associating each returned
/// record with its uri by position. Uris the service could not resolve are
/// omitted from the result. Empty input yields an empty map with no calls
/// made; a failed batch is skipped without aborting the rest.
pub async fn fetch_audio_features(
    api: &mut impl PlaylistApi,
    track_uris: &[String],
) -> HashMap<String, AudioFeatures> {
    let mut features = HashMap::new();

    batched(
        track_uris,
        FEATURE_BATCH_SIZE,
        async |chunk: &[String]| {
            let ids: Vec<String> = chunk
                .iter()
                .map(|uri| utils::id_from_uri(uri).to_string())
                .collect();
            api.audio_features(&ids).await
        },
        |chunk, found| {
            for (uri, feature) in chunk.iter().zip(found) {
                if let Some(feature) = feature {
                    features.insert(uri.clone(), feature);
                }
            }
        },
    )
    .await;

    features
}

/// Fetches genre lists for the given artist ids, batching at most
/// [`ARTIST_BATCH_SIZE`] ids per call. An artist the service reports without
/// genres maps to an empty list. Empty input yields an empty map with no
/// calls made.
pub async fn fetch_artist_genres(
    api: &mut impl PlaylistApi,
    artist_ids: &[String],
) -> HashMap<String, Vec<String>> {
    let mut genres = HashMap::new();

    batched(
        artist_ids,
        ARTIST_BATCH_SIZE,
        async |chunk: &[String]| api.artists(chunk).await,
        |_, found| {
            for artist in found.into_iter().flatten() {
                genres.insert(artist.id, artist.genres.unwrap_or_default());
            }
        },
    )
    .await;

    genres
}

/// Replaces a playlist's contents with a uniform random permutation of its
/// current tracks, written back in chunks of at most [`WRITE_CHUNK_SIZE`]
/// uris. An empty playlist is a logged no-op. Returns the number of tracks
/// written.
///
/// The write is not atomic across chunks: a failure partway leaves the
/// playlist in a partially shuffled state.
pub async fn shuffle_playlist(api: &mut impl PlaylistApi, playlist_id: &str) -> Res<usize> {
    let mut uris = fetch_playlist_track_uris(api, playlist_id).await;
    if uris.is_empty() {
        info!("Playlist {} is empty, nothing to shuffle.", playlist_id);
        return Ok(0);
    }

    uris.shuffle(&mut rand::rng());

    let mut chunks = uris.chunks(WRITE_CHUNK_SIZE);
    if let Some(first) = chunks.next() {
        api.replace_playlist_items(playlist_id, first).await?;
    }
    for chunk in chunks {
        api.add_playlist_items(playlist_id, chunk).await?;
    }

    Ok(uris.len())
}

/// Copies the first half of the user's liked tracks, in library order, into
/// a freshly created private playlist. Returns the new playlist's id and the
/// number of tracks copied.
pub async fn duplicate_liked_half(
    api: &mut impl PlaylistApi,
    name: &str,
) -> Res<(String, usize)> {
    let uris = fetch_liked_track_uris(api).await;
    if uris.is_empty() {
        return Err("no liked tracks to duplicate".into());
    }

    let half = utils::first_half(&uris);
    let playlist = api
        .create_playlist(name, "First half of Liked Songs, copied by splancli.")
        .await?;

    for chunk in half.chunks(WRITE_CHUNK_SIZE) {
        api.add_playlist_items(&playlist.id, chunk).await?;
    }

    Ok((playlist.id, half.len()))
}

/// Fetches track recommendations seeded by up to [`MAX_RECOMMENDATION_SEEDS`]
/// track uris; extra seeds are dropped, mirroring the service's own limit.
/// Genres are intentionally left empty, and any failure yields an empty list
/// rather than an error.
pub async fn recommendations(
    api: &mut impl PlaylistApi,
    seed_uris: &[String],
    limit: u32,
) -> Vec<TrackRecord> {
    if seed_uris.is_empty() {
        return Vec::new();
    }

    let seeds: Vec<String> = seed_uris
        .iter()
        .take(MAX_RECOMMENDATION_SEEDS)
        .map(|uri| utils::id_from_uri(uri).to_string())
        .collect();

    match api.recommendations(&seeds, limit).await {
        Ok(found) => found
            .into_iter()
            .map(|track| TrackRecord::from_track(track, None, Vec::new()))
            .collect(),
        Err(e) => {
            warning!("Failed to fetch recommendations: {}", e);
            Vec::new()
        }
    }
}
