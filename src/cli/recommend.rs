use tabled::Table;

use crate::{
    aggregate, success,
    types::TrackTableRow,
    utils::{self, Selection},
    warning,
};

pub async fn recommend(selection: Selection, limit: u32) {
    let mut client = super::authenticated_client().await;

    let (label, seeds) = match selection {
        Selection::Liked => {
            let pb = super::spinner("Fetching liked tracks...");
            let uris = aggregate::fetch_liked_track_uris(&mut client).await;
            pb.finish_and_clear();
            ("Liked Songs".to_string(), uris)
        }
        Selection::Index(number) => {
            let playlist = super::resolve_playlist(&mut client, number).await;
            let pb = super::spinner(&format!("Fetching tracks of '{}'...", playlist.name));
            let uris = aggregate::fetch_playlist_track_uris(&mut client, &playlist.id).await;
            pb.finish_and_clear();
            (playlist.name, uris)
        }
    };

    if seeds.is_empty() {
        warning!("No tracks in {} to seed recommendations from.", label);
        return;
    }

    let pb = super::spinner("Fetching recommendations...");
    let recommended = aggregate::recommendations(&mut client, &seeds, limit).await;
    pb.finish_and_clear();

    if recommended.is_empty() {
        warning!("No recommendations returned for {}.", label);
        return;
    }

    let table_rows: Vec<TrackTableRow> = recommended
        .iter()
        .map(|t| TrackTableRow {
            name: t.name.clone(),
            artist: t.artist.clone(),
            album: t.album.clone(),
            added: "-".to_string(),
            duration: utils::format_duration(t.duration_ms),
            popularity: t.popularity,
            genres: String::new(),
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);

    success!(
        "{} recommendations seeded from {}.",
        recommended.len(),
        label
    );
}
