use crate::entities::scores::ScoreEntity;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Plays on one beatmap status, grouped by beatmap md5.
pub type PlaysByBeatmap = HashMap<String, Vec<ScoreEntity>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePlays {
    #[serde(default)]
    pub ranked_plays: PlaysByBeatmap,
    #[serde(default)]
    pub approved_plays: PlaysByBeatmap,
    #[serde(default)]
    pub qualified_plays: PlaysByBeatmap,
    #[serde(default)]
    pub loved_plays: PlaysByBeatmap,
    #[serde(default)]
    pub all_plays: Vec<ScoreEntity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub plays: ProfilePlays,
}

impl Profile {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Default::default()
        }
    }
}
