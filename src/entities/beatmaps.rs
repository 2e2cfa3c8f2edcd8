use serde::{Deserialize, Serialize};

/// Persisted shape of a registry entry, keyed by `md5` in `beatmaps.json`.
///
/// Modified beatmaps carry `file_path` and the canonical `original_bmap` they
/// were derived from; canonical beatmaps carry neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatmapRecord {
    pub md5: String,
    pub id: i32,
    pub setid: i32,
    pub rank_status: i8,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub title_unicode: Option<String>,
    #[serde(default)]
    pub artist_unicode: Option<String>,
    pub version: String,
    pub max_combo: i32,
    #[serde(default)]
    pub file_content: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub original_bmap: Option<Box<BeatmapRecord>>,
}
