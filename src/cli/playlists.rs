use tabled::Table;

use crate::{aggregate, types::PlaylistTableRow, warning};

pub async fn list_playlists() {
    let mut client = super::authenticated_client().await;

    let pb = super::spinner("Fetching your playlists...");
    let playlists = aggregate::fetch_playlists(&mut client).await;
    pb.finish_and_clear();

    if playlists.is_empty() {
        warning!("No playlists found.");
        return;
    }

    let table_rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .enumerate()
        .map(|(i, p)| PlaylistTableRow {
            index: i + 1,
            name: p.name,
            owner: p.owner.unwrap_or_default(),
            tracks: p.track_count,
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);
    println!("Use a number above (or 'liked') with analyze, shuffle, and recommend.");
}
