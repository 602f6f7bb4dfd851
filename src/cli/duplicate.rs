use chrono::Local;

use crate::{aggregate, error, success};

pub async fn duplicate_liked() {
    let mut client = super::authenticated_client().await;

    let name = format!("Liked Songs (first half) {}", Local::now().format("%Y-%m-%d"));

    let pb = super::spinner("Copying liked tracks...");
    let result = aggregate::duplicate_liked_half(&mut client, &name).await;
    pb.finish_and_clear();

    match result {
        Ok((id, count)) => success!("Copied {} liked tracks into '{}' ({}).", count, name, id),
        Err(e) => {
            error!("Failed to duplicate liked tracks: {}", e);
        }
    }
}
