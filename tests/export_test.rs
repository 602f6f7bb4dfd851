use std::collections::HashMap;

use chrono::DateTime;
use serde_json::Value;
use splancli::export::export_analysis;
use splancli::types::{AudioFeatures, TrackRecord};

fn record(id: &str, genres: &[&str]) -> TrackRecord {
    TrackRecord {
        id: id.to_string(),
        name: format!("Track {}", id),
        artist: "Artist A".to_string(),
        artist_id: "A".to_string(),
        album: "Test Album".to_string(),
        duration_ms: 180_000,
        popularity: 50,
        added_at: Some("2024-01-15T08:00:00Z".to_string()),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        uri: format!("spotify:track:{}", id),
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
async fn test_export_analysis_writes_document() {
    let tracks = vec![record("t1", &["pop", "rock"]), record("t2", &[])];
    let features: HashMap<String, AudioFeatures> =
        [("spotify:track:t1".to_string(), feature(128.0))].into();

    let path = std::env::temp_dir().join(format!("splancli_export_test_{}.json", std::process::id()));

    let written = export_analysis(&tracks, &features, Some(path.clone()))
        .await
        .unwrap();
    assert_eq!(written, path);

    let raw = std::fs::read_to_string(&path).unwrap();
    let doc: Value = serde_json::from_str(&raw).unwrap();

    // Timestamp is a parseable RFC 3339 instant
    let generated_at = doc["generated_at"].as_str().unwrap();
    assert!(DateTime::parse_from_rfc3339(generated_at).is_ok());

    // Tracks are embedded fully, count matches
    assert_eq!(doc["track_count"].as_u64(), Some(2));
    assert_eq!(doc["tracks"].as_array().unwrap().len(), 2);
    assert_eq!(doc["tracks"][0]["id"], "t1");
    assert_eq!(doc["tracks"][0]["genres"][0], "pop");
    assert_eq!(doc["tracks"][1]["added_at"], "2024-01-15T08:00:00Z");

    // Features keyed by uri; absent uris stay absent
    assert_eq!(doc["audio_features"]["spotify:track:t1"]["tempo"], 128.0);
    assert!(doc["audio_features"]["spotify:track:t2"].is_null());

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_export_analysis_empty_inputs() {
    let path =
        std::env::temp_dir().join(format!("splancli_export_empty_{}.json", std::process::id()));

    let written = export_analysis(&[], &HashMap::new(), Some(path.clone()))
        .await
        .unwrap();

    let raw = std::fs::read_to_string(&written).unwrap();
    let doc: Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(doc["track_count"].as_u64(), Some(0));
    assert!(doc["tracks"].as_array().unwrap().is_empty());

    std::fs::remove_file(&written).unwrap();
}
