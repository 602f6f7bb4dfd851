use crate::{aggregate, error, success, utils::Selection};

pub async fn shuffle(selection: Selection) {
    let Selection::Index(number) = selection else {
        error!("Liked Songs cannot be shuffled in place. Pick a playlist number.");
    };

    let mut client = super::authenticated_client().await;
    let playlist = super::resolve_playlist(&mut client, number).await;

    let pb = super::spinner(&format!("Shuffling '{}'...", playlist.name));
    let result = aggregate::shuffle_playlist(&mut client, &playlist.id).await;
    pb.finish_and_clear();

    match result {
        Ok(0) => {}
        Ok(count) => success!("Shuffled {} tracks in '{}'.", count, playlist.name),
        Err(e) => {
            error!("Failed to shuffle '{}': {}", playlist.name, e);
        }
    }
}
