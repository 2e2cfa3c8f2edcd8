use crate::models::beatmaps::Beatmap;
use crate::models::performance::RecalculationSummary;
use crate::models::scores::Score;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PLAYS_LIMIT: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ProfileArgs {
    #[serde(rename = "u")]
    pub name: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub status: &'static str,
    pub name: String,
    pub playcount: usize,
    pub pp: f32,
}

#[derive(Debug, Serialize)]
pub struct BeatmapSummary {
    pub md5: String,
    pub id: i32,
    pub setid: i32,
    pub rank_status: i8,
    pub title: String,
    pub artist: String,
    pub version: String,
    pub max_combo: i32,
    pub modified: bool,
}

impl From<&Beatmap> for BeatmapSummary {
    fn from(beatmap: &Beatmap) -> Self {
        Self {
            md5: beatmap.beatmap_md5().to_owned(),
            id: beatmap.beatmap_id(),
            setid: beatmap.beatmapset_id(),
            rank_status: beatmap.ranked_status().as_i8(),
            title: beatmap.title().to_owned(),
            artist: beatmap.artist().to_owned(),
            version: beatmap.version().to_owned(),
            max_combo: beatmap.max_combo(),
            modified: beatmap.is_modified(),
        }
    }
}

/// A play as shown by the read api: no replay, with its beatmap attached.
#[derive(Debug, Serialize)]
pub struct PlayResponse {
    pub id: i64,
    pub name: String,
    pub md5: String,
    pub mode: u8,
    pub mods: u32,
    pub mods_str: String,
    pub score: i64,
    pub n300: u32,
    pub n100: u32,
    pub n50: u32,
    pub nmiss: u32,
    pub nkatu: u32,
    pub ngeki: u32,
    pub max_combo: u32,
    pub perfect: bool,
    pub time: i64,
    pub played_at: Option<DateTime<Utc>>,
    pub pp: f32,
    pub acc: f32,
    pub bmap: Option<BeatmapSummary>,
}

impl PlayResponse {
    pub fn new(score: Score, beatmap: Option<&Beatmap>) -> Self {
        let played_at = score.played_at();
        Self {
            id: score.score_id,
            name: score.username,
            md5: score.beatmap_md5,
            mode: score.mode as u8,
            mods: score.mods.bits(),
            mods_str: score.mods.to_string(),
            score: score.score,
            n300: score.statistics.n300,
            n100: score.statistics.n100,
            n50: score.statistics.n50,
            nmiss: score.statistics.nmiss,
            nkatu: score.statistics.nkatu,
            ngeki: score.statistics.ngeki,
            max_combo: score.max_combo,
            perfect: score.perfect,
            time: score.time,
            played_at,
            pp: score.performance,
            acc: score.accuracy,
            bmap: beatmap.map(BeatmapSummary::from),
        }
    }
}

#[derive(Serialize)]
pub struct PlaysResponse {
    pub status: &'static str,
    pub name: String,
    pub plays: Vec<PlayResponse>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: String,
}

#[derive(Serialize)]
pub struct RecalculationResponse {
    pub status: &'static str,
    pub message: &'static str,
    #[serde(flatten)]
    pub summary: RecalculationSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileStats {
    pub name: String,
    pub playcount: usize,
    /// Best play per beatmap, weighted by 0.95 per position.
    pub pp: f32,
}
