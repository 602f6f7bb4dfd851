use std::collections::{BTreeSet, HashMap};

use splancli::Res;
use splancli::aggregate::{self, PlaylistApi};
use splancli::types::{
    AlbumRef, ArtistObject, ArtistRef, AudioFeatures, CreatePlaylistResponse, OwnerObject,
    PlaylistItemObject, PlaylistObject, TrackObject, TrackTotals,
};

/// In-memory stand-in for the remote service. Holds flat collections that
/// get sliced per page, plus call logs so tests can assert on request counts
/// and batch shapes.
#[derive(Default)]
struct MockApi {
    playlists: Vec<PlaylistObject>,
    saved_items: Vec<PlaylistItemObject>,
    playlist_items: Vec<PlaylistItemObject>,
    features: HashMap<String, AudioFeatures>,
    artist_genres: HashMap<String, Vec<String>>,
    recommended: Vec<TrackObject>,

    fail_playlists_at_offset: Option<u32>,
    fail_feature_batch: Option<usize>,
    fail_recommendations: bool,

    playlists_requests: usize,
    saved_requests: usize,
    item_requests: usize,
    feature_calls: Vec<Vec<String>>,
    artist_calls: Vec<Vec<String>>,
    recommendation_calls: Vec<Vec<String>>,
    created: Vec<(String, String)>,
    replaced: Vec<(String, Vec<String>)>,
    appended: Vec<(String, Vec<String>)>,
}

fn page<T: Clone>(items: &[T], limit: u32, offset: u32) -> Vec<T> {
    let start = offset as usize;
    if start >= items.len() {
        return Vec::new();
    }
    let end = (start + limit as usize).min(items.len());
    items[start..end].to_vec()
}

impl PlaylistApi for MockApi {
    async fn playlists_page(&mut self, limit: u32, offset: u32) -> Res<Vec<PlaylistObject>> {
        self.playlists_requests += 1;
        if self.fail_playlists_at_offset == Some(offset) {
            return Err("server error".into());
        }
        Ok(page(&self.playlists, limit, offset))
    }

    async fn saved_tracks_page(
        &mut self,
        limit: u32,
        offset: u32,
    ) -> Res<Vec<PlaylistItemObject>> {
        self.saved_requests += 1;
        Ok(page(&self.saved_items, limit, offset))
    }

    async fn playlist_items_page(
        &mut self,
        _playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Res<Vec<PlaylistItemObject>> {
        self.item_requests += 1;
        Ok(page(&self.playlist_items, limit, offset))
    }

    async fn audio_features(&mut self, track_ids: &[String]) -> Res<Vec<Option<AudioFeatures>>> {
        let batch_index = self.feature_calls.len();
        self.feature_calls.push(track_ids.to_vec());
        if self.fail_feature_batch == Some(batch_index) {
            return Err("rate limited".into());
        }
        Ok(track_ids
            .iter()
            .map(|id| self.features.get(id).cloned())
            .collect())
    }

    async fn artists(&mut self, artist_ids: &[String]) -> Res<Vec<Option<ArtistObject>>> {
        self.artist_calls.push(artist_ids.to_vec());
        Ok(artist_ids
            .iter()
            .map(|id| {
                self.artist_genres.get(id).map(|genres| ArtistObject {
                    id: id.clone(),
                    name: format!("Artist {}", id),
                    genres: Some(genres.clone()),
                })
            })
            .collect())
    }

    async fn create_playlist(
        &mut self,
        name: &str,
        description: &str,
    ) -> Res<CreatePlaylistResponse> {
        self.created.push((name.to_string(), description.to_string()));
        Ok(CreatePlaylistResponse {
            id: "new-playlist".to_string(),
            name: name.to_string(),
        })
    }

    async fn replace_playlist_items(&mut self, playlist_id: &str, uris: &[String]) -> Res<()> {
        self.replaced.push((playlist_id.to_string(), uris.to_vec()));
        Ok(())
    }

    async fn add_playlist_items(&mut self, playlist_id: &str, uris: &[String]) -> Res<()> {
        self.appended.push((playlist_id.to_string(), uris.to_vec()));
        Ok(())
    }

    async fn recommendations(&mut self, seed_ids: &[String], limit: u32) -> Res<Vec<TrackObject>> {
        self.recommendation_calls.push(seed_ids.to_vec());
        if self.fail_recommendations {
            return Err("bad seeds".into());
        }
        Ok(self
            .recommended
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

// Helper function to create a test playlist object
fn playlist_object(i: usize) -> PlaylistObject {
    PlaylistObject {
        id: format!("playlist-{}", i),
        name: format!("Playlist {}", i),
        owner: Some(OwnerObject {
            display_name: Some("tester".to_string()),
        }),
        public: Some(true),
        collaborative: false,
        images: None,
        tracks: TrackTotals { total: 10 },
        created_at: None,
        updated_at: None,
    }
}

// Helper function to create a test track with the given artists
fn track(id: &str, artist_ids: &[&str]) -> TrackObject {
    TrackObject {
        id: Some(id.to_string()),
        name: format!("Track {}", id),
        uri: format!("spotify:track:{}", id),
        duration_ms: 180_000,
        popularity: Some(50),
        artists: artist_ids
            .iter()
            .map(|a| ArtistRef {
                id: Some(a.to_string()),
                name: format!("Artist {}", a),
            })
            .collect(),
        album: AlbumRef {
            name: "Test Album".to_string(),
        },
    }
}

fn item(track: TrackObject) -> PlaylistItemObject {
    PlaylistItemObject {
        added_at: Some("2024-01-15T08:00:00Z".to_string()),
        track: Some(track),
    }
}

fn feature(tempo: f64) -> AudioFeatures {
    AudioFeatures {
        danceability: 0.5,
        energy: 0.6,
        key: 5,
        loudness: -7.0,
        mode: 1,
        speechiness: 0.05,
        acousticness: 0.2,
        instrumentalness: 0.0,
        liveness: 0.1,
        valence: 0.4,
        tempo,
        time_signature: 4,
    }
}

#[tokio::test]
async fn test_playlists_pagination_stops_on_short_page() {
    let mut api = MockApi {
        playlists: (0..120).map(playlist_object).collect(),
        ..Default::default()
    };

    let playlists = aggregate::fetch_playlists(&mut api).await;

    // All pages flattened, in server order
    assert_eq!(playlists.len(), 120);
    assert_eq!(playlists[0].id, "playlist-0");
    assert_eq!(playlists[119].id, "playlist-119");

    // 120 items at page size 50: two full pages plus the short final page,
    // and the short page ends the walk without an extra request
    assert_eq!(api.playlists_requests, 3);
}

#[tokio::test]
async fn test_playlists_page_failure_returns_partial() {
    let mut api = MockApi {
        playlists: (0..120).map(playlist_object).collect(),
        fail_playlists_at_offset: Some(50),
        ..Default::default()
    };

    let playlists = aggregate::fetch_playlists(&mut api).await;

    // The first page survives; the failing page stops the walk
    assert_eq!(playlists.len(), 50);
    assert_eq!(api.playlists_requests, 2);
}

#[tokio::test]
async fn test_audio_features_batches_capped_and_ordered() {
    let ids: Vec<String> = (0..250).map(|i| format!("t{:03}", i)).collect();
    let uris: Vec<String> = ids.iter().map(|id| format!("spotify:track:{}", id)).collect();

    let mut api = MockApi {
        features: ids.iter().map(|id| (id.clone(), feature(120.0))).collect(),
        ..Default::default()
    };

    let found = aggregate::fetch_audio_features(&mut api, &uris).await;

    // Every uri resolved, keyed by the original uri
    assert_eq!(found.len(), 250);
    assert!(found.contains_key("spotify:track:t000"));
    assert!(found.contains_key("spotify:track:t249"));

    // 250 ids at batch size 100: three calls, none above the cap
    assert_eq!(api.feature_calls.len(), 3);
    assert!(api.feature_calls.iter().all(|c| c.len() <= 100));

    // Concatenated calls preserve input order, with uris stripped to ids
    let requested: Vec<String> = api.feature_calls.concat();
    assert_eq!(requested, ids);
}

#[tokio::test]
async fn test_audio_features_empty_input_makes_no_calls() {
    let mut api = MockApi::default();

    let found = aggregate::fetch_audio_features(&mut api, &[]).await;

    assert!(found.is_empty());
    assert!(api.feature_calls.is_empty());
}

#[tokio::test]
async fn test_audio_features_unresolved_ids_omitted() {
    let uris = vec![
        "spotify:track:t0".to_string(),
        "spotify:track:t1".to_string(),
        "spotify:track:t2".to_string(),
    ];

    let mut api = MockApi {
        features: [
            ("t0".to_string(), feature(100.0)),
            ("t2".to_string(), feature(140.0)),
        ]
        .into(),
        ..Default::default()
    };

    let found = aggregate::fetch_audio_features(&mut api, &uris).await;

    // Unresolvable ids are simply absent, not present-with-default
    assert_eq!(found.len(), 2);
    assert!(!found.contains_key("spotify:track:t1"));
    assert_eq!(found["spotify:track:t2"].tempo, 140.0);
}

#[tokio::test]
async fn test_audio_features_failed_batch_skipped() {
    let ids: Vec<String> = (0..150).map(|i| format!("t{:03}", i)).collect();
    let uris: Vec<String> = ids.iter().map(|id| format!("spotify:track:{}", id)).collect();

    let mut api = MockApi {
        features: ids.iter().map(|id| (id.clone(), feature(120.0))).collect(),
        fail_feature_batch: Some(0),
        ..Default::default()
    };

    let found = aggregate::fetch_audio_features(&mut api, &uris).await;

    // First batch lost, second batch still fetched
    assert_eq!(api.feature_calls.len(), 2);
    assert_eq!(found.len(), 50);
    assert!(!found.contains_key("spotify:track:t000"));
    assert!(found.contains_key("spotify:track:t100"));
}

#[tokio::test]
async fn test_genre_union_across_artists() {
    let mut api = MockApi {
        playlist_items: vec![
            item(track("t1", &["A"])),
            item(track("t2", &["A", "B"])),
            item(track("t3", &["B", "A"])),
        ],
        artist_genres: [
            ("A".to_string(), vec!["pop".to_string(), "rock".to_string()]),
            ("B".to_string(), vec!["rock".to_string(), "ambient".to_string()]),
        ]
        .into(),
        ..Default::default()
    };

    let tracks = aggregate::fetch_playlist_tracks(&mut api, "playlist-1").await;

    assert_eq!(tracks.len(), 3);

    // Single artist: that artist's genres, sorted
    assert_eq!(tracks[0].genres, vec!["pop", "rock"]);

    // Multiple artists: sorted, deduplicated union
    assert_eq!(tracks[1].genres, vec!["ambient", "pop", "rock"]);
    assert_eq!(tracks[2].genres, vec!["ambient", "pop", "rock"]);

    // Provenance came through
    assert_eq!(tracks[0].added_at.as_deref(), Some("2024-01-15T08:00:00Z"));

    // One artist lookup for the whole page, ids deduplicated in first-seen order
    assert_eq!(api.artist_calls.len(), 1);
    assert_eq!(api.artist_calls[0], vec!["A", "B"]);
}

#[tokio::test]
async fn test_artist_lookup_is_per_page() {
    // 150 items span two pages; the same artist is looked up once per page
    let mut api = MockApi {
        playlist_items: (0..150).map(|i| item(track(&format!("t{}", i), &["A"]))).collect(),
        artist_genres: [("A".to_string(), vec!["pop".to_string()])].into(),
        ..Default::default()
    };

    let tracks = aggregate::fetch_playlist_tracks(&mut api, "playlist-1").await;

    assert_eq!(tracks.len(), 150);
    assert_eq!(api.artist_calls.len(), 2);
    assert_eq!(api.artist_calls[0], vec!["A"]);
    assert_eq!(api.artist_calls[1], vec!["A"]);
}

#[tokio::test]
async fn test_null_track_items_skipped() {
    let mut api = MockApi {
        playlist_items: vec![
            item(track("t1", &["A"])),
            PlaylistItemObject {
                added_at: Some("2024-01-15T08:00:00Z".to_string()),
                track: None,
            },
            item(track("t2", &["A"])),
        ],
        ..Default::default()
    };

    let tracks = aggregate::fetch_playlist_tracks(&mut api, "playlist-1").await;

    // The removed-from-catalog item vanishes without an error
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].id, "t1");
    assert_eq!(tracks[1].id, "t2");

    let uris = aggregate::fetch_playlist_track_uris(&mut api, "playlist-1").await;
    assert_eq!(uris, vec!["spotify:track:t1", "spotify:track:t2"]);
}

#[tokio::test]
async fn test_liked_tracks_have_no_provenance_or_genres() {
    let mut api = MockApi {
        saved_items: vec![item(track("t1", &["A"])), item(track("t2", &["B"]))],
        artist_genres: [("A".to_string(), vec!["pop".to_string()])].into(),
        ..Default::default()
    };

    let uris = aggregate::fetch_liked_track_uris(&mut api).await;
    assert_eq!(uris, vec!["spotify:track:t1", "spotify:track:t2"]);

    let tracks = aggregate::fetch_liked_tracks(&mut api).await;
    assert_eq!(tracks.len(), 2);

    // Library records carry neither added_at nor genres, and no artist
    // lookup is made for them
    assert!(tracks.iter().all(|t| t.added_at.is_none()));
    assert!(tracks.iter().all(|t| t.genres.is_empty()));
    assert!(api.artist_calls.is_empty());
}

#[tokio::test]
async fn test_shuffle_writes_permutation_in_chunks() {
    let mut api = MockApi {
        playlist_items: (0..130).map(|i| item(track(&format!("t{:03}", i), &["A"]))).collect(),
        ..Default::default()
    };

    let written = aggregate::shuffle_playlist(&mut api, "playlist-1").await.unwrap();
    assert_eq!(written, 130);

    // First chunk replaces, the remainder appends
    assert_eq!(api.replaced.len(), 1);
    assert_eq!(api.replaced[0].1.len(), 100);
    assert_eq!(api.appended.len(), 1);
    assert_eq!(api.appended[0].1.len(), 30);

    // Written uris are exactly the original set
    let mut reordered: Vec<String> = api.replaced[0].1.clone();
    reordered.extend(api.appended[0].1.clone());
    let original: Vec<String> = (0..130).map(|i| format!("spotify:track:t{:03}", i)).collect();
    let written_set: BTreeSet<&String> = reordered.iter().collect();
    let original_set: BTreeSet<&String> = original.iter().collect();
    assert_eq!(written_set, original_set);

    // A 130-element uniform permutation landing back in input order is
    // effectively impossible
    assert_ne!(reordered, original);
}

#[tokio::test]
async fn test_shuffle_empty_playlist_is_noop() {
    let mut api = MockApi::default();

    let written = aggregate::shuffle_playlist(&mut api, "playlist-1").await.unwrap();

    assert_eq!(written, 0);
    assert!(api.replaced.is_empty());
    assert!(api.appended.is_empty());
}

#[tokio::test]
async fn test_duplicate_liked_half_copies_first_half_in_order() {
    let mut api = MockApi {
        saved_items: (0..5).map(|i| item(track(&format!("t{}", i), &["A"]))).collect(),
        ..Default::default()
    };

    let (id, count) = aggregate::duplicate_liked_half(&mut api, "First half")
        .await
        .unwrap();

    assert_eq!(id, "new-playlist");

    // 5 liked tracks: ceil(5 / 2) = 3 copied, library order preserved
    assert_eq!(count, 3);
    assert_eq!(api.created.len(), 1);
    assert_eq!(api.created[0].0, "First half");
    assert_eq!(api.appended.len(), 1);
    assert_eq!(api.appended[0].0, "new-playlist");
    assert_eq!(
        api.appended[0].1,
        vec!["spotify:track:t0", "spotify:track:t1", "spotify:track:t2"]
    );
}

#[tokio::test]
async fn test_duplicate_with_no_liked_tracks_errors() {
    let mut api = MockApi::default();

    let result = aggregate::duplicate_liked_half(&mut api, "First half").await;

    assert!(result.is_err());
    assert!(api.created.is_empty());
    assert!(api.appended.is_empty());
}

#[tokio::test]
async fn test_recommendation_seeds_capped_at_five() {
    let seeds: Vec<String> = (0..8).map(|i| format!("spotify:track:t{}", i)).collect();

    let mut api = MockApi {
        recommended: vec![track("r1", &["A"]), track("r2", &["B"])],
        ..Default::default()
    };

    let recommended = aggregate::recommendations(&mut api, &seeds, 20).await;

    assert_eq!(recommended.len(), 2);

    // Only the first five seeds are sent, stripped to bare ids
    assert_eq!(api.recommendation_calls.len(), 1);
    assert_eq!(api.recommendation_calls[0], vec!["t0", "t1", "t2", "t3", "t4"]);

    // Recommendations carry no provenance or genres
    assert!(recommended.iter().all(|t| t.added_at.is_none()));
    assert!(recommended.iter().all(|t| t.genres.is_empty()));
}

#[tokio::test]
async fn test_recommendations_failure_yields_empty() {
    let seeds = vec!["spotify:track:t0".to_string()];

    let mut api = MockApi {
        fail_recommendations: true,
        ..Default::default()
    };

    let recommended = aggregate::recommendations(&mut api, &seeds, 20).await;

    assert!(recommended.is_empty());
    assert_eq!(api.recommendation_calls.len(), 1);
}

#[tokio::test]
async fn test_recommendations_empty_seeds_make_no_call() {
    let mut api = MockApi::default();

    let recommended = aggregate::recommendations(&mut api, &[], 20).await;

    assert!(recommended.is_empty());
    assert!(api.recommendation_calls.is_empty());
}
