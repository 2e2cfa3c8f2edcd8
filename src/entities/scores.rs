use serde::{Deserialize, Serialize};

/// A play as stored in a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntity {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub user_id: i64,
    pub md5: String,
    #[serde(default)]
    pub mode: u8,
    pub mods: u32,
    pub score: i64,
    pub n300: u32,
    pub n100: u32,
    pub n50: u32,
    pub nmiss: u32,
    #[serde(default)]
    pub nkatu: u32,
    #[serde(default)]
    pub ngeki: u32,
    pub max_combo: u32,
    #[serde(default)]
    pub perfect: bool,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub pp: f32,
    #[serde(default)]
    pub acc: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay_frames: Option<String>,
}
