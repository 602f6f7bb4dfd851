use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use tabled::Table;

use crate::{
    aggregate, error, export, info, success,
    types::{AudioFeatures, TrackRecord, TrackTableRow},
    utils::{self, Selection},
    warning,
};

pub async fn analyze(selection: Selection, export_json: bool, output: Option<PathBuf>) {
    let mut client = super::authenticated_client().await;

    let (label, tracks) = match selection {
        Selection::Liked => {
            let pb = super::spinner("Fetching liked tracks...");
            let tracks = aggregate::fetch_liked_tracks(&mut client).await;
            pb.finish_and_clear();
            ("Liked Songs".to_string(), tracks)
        }
        Selection::Index(number) => {
            let playlist = super::resolve_playlist(&mut client, number).await;
            let pb = super::spinner(&format!("Fetching tracks of '{}'...", playlist.name));
            let tracks = aggregate::fetch_playlist_tracks(&mut client, &playlist.id).await;
            pb.finish_and_clear();
            (playlist.name, tracks)
        }
    };

    if tracks.is_empty() {
        warning!("No tracks found in {}.", label);
        return;
    }

    let pb = super::spinner("Fetching audio features...");
    let uris: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();
    let features = aggregate::fetch_audio_features(&mut client, &uris).await;
    pb.finish_and_clear();

    success!(
        "Analyzed {} tracks from {} ({} with audio features).",
        tracks.len(),
        label,
        features.len()
    );

    let table_rows: Vec<TrackTableRow> = tracks
        .iter()
        .map(|t| TrackTableRow {
            name: t.name.clone(),
            artist: t.artist.clone(),
            album: t.album.clone(),
            added: t.added_at.clone().unwrap_or_else(|| "-".to_string()),
            duration: utils::format_duration(t.duration_ms),
            popularity: t.popularity,
            genres: t.genres.join(", "),
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);

    print_statistics(&tracks, &features);

    if export_json {
        match export::export_analysis(&tracks, &features, output).await {
            Ok(path) => success!("Analysis written to {}.", path.display()),
            Err(e) => {
                error!("Failed to write analysis: {}", e);
            }
        }
    }
}

fn print_statistics(tracks: &[TrackRecord], features: &HashMap<String, AudioFeatures>) {
    let artists: HashSet<&str> = tracks.iter().map(|t| t.artist.as_str()).collect();
    let total_ms: u64 = tracks.iter().map(|t| t.duration_ms).sum();
    let mean_popularity =
        tracks.iter().map(|t| t.popularity as f64).sum::<f64>() / tracks.len() as f64;

    info!(
        "{} tracks by {} artists, {} total, mean popularity {:.1}.",
        tracks.len(),
        artists.len(),
        utils::format_duration(total_ms),
        mean_popularity
    );

    if !features.is_empty() {
        let n = features.len() as f64;
        let tempo = features.values().map(|f| f.tempo).sum::<f64>() / n;
        let energy = features.values().map(|f| f.energy).sum::<f64>() / n;
        let danceability = features.values().map(|f| f.danceability).sum::<f64>() / n;
        let valence = features.values().map(|f| f.valence).sum::<f64>() / n;

        info!(
            "Mean tempo {:.1} BPM, energy {:.2}, danceability {:.2}, valence {:.2}.",
            tempo, energy, danceability, valence
        );
    }

    let mut genre_counts: HashMap<&str, usize> = HashMap::new();
    for track in tracks {
        for genre in &track.genres {
            *genre_counts.entry(genre.as_str()).or_default() += 1;
        }
    }

    if !genre_counts.is_empty() {
        let mut ranked: Vec<(&str, usize)> = genre_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

        let top = ranked
            .iter()
            .take(10)
            .map(|(genre, count)| format!("{} ({})", genre, count))
            .collect::<Vec<String>>()
            .join(", ");
        info!("Top genres: {}", top);
    }
}
