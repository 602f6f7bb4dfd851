//! JSON export of analysis results.
//!
//! Serializes a flat document with a generation timestamp, the analyzed
//! track list, and the full audio-feature mapping keyed by track uri. Pure
//! formatting; no network calls happen here.

use std::{collections::HashMap, path::PathBuf};

use chrono::Local;
use serde::Serialize;

use crate::{
    Res,
    types::{AudioFeatures, TrackRecord},
    utils,
};

#[derive(Serialize)]
struct AnalysisDocument<'a> {
    generated_at: String,
    track_count: usize,
    tracks: &'a [TrackRecord],
    audio_features: &'a HashMap<String, AudioFeatures>,
}

/// Writes the analysis document to `filepath`, or to a timestamped
/// `analysis_YYYYMMDD_HHMMSS.json` in the working directory when no path is
/// given. Returns the path written.
pub async fn export_analysis(
    tracks: &[TrackRecord],
    features: &HashMap<String, AudioFeatures>,
    filepath: Option<PathBuf>,
) -> Res<PathBuf> {
    let now = Local::now();
    let path = filepath.unwrap_or_else(|| PathBuf::from(utils::analysis_filename(now)));

    let document = AnalysisDocument {
        generated_at: now.to_rfc3339(),
        track_count: tracks.len(),
        tracks,
        audio_features: features,
    };

    let json = serde_json::to_string_pretty(&document)?;
    async_fs::write(&path, json).await?;

    Ok(path)
}
