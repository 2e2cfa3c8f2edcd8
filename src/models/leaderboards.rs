use crate::models::beatmaps::{Beatmap, RankedStatus};
use crate::models::mods::Mods;
use crate::models::scores::Score;
use serde::Deserialize;
use std::fmt::Write;

#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardType {
    Local = 0,
    #[default]
    Top = 1,
    Mods = 2,
    Friends = 3,
    Country = 4,
}

impl From<u8> for LeaderboardType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Local,
            2 => Self::Mods,
            3 => Self::Friends,
            4 => Self::Country,
            _ => Self::Top,
        }
    }
}

/// Query string of `/web/osu-osz2-getscores.php`.
#[derive(Debug, Deserialize)]
pub struct LeaderboardRequestArgs {
    #[serde(rename = "f")]
    pub filename: String,
    #[serde(rename = "c")]
    pub beatmap_md5: String,
    #[serde(default)]
    pub mods: u32,
    #[serde(rename = "v", default)]
    pub leaderboard_type: u8,
    #[serde(rename = "us", default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LeaderboardRequest {
    pub filename: String,
    pub beatmap_md5: String,
    pub mods: Mods,
    pub leaderboard_type: LeaderboardType,
    pub username: Option<String>,
}

impl From<LeaderboardRequestArgs> for LeaderboardRequest {
    fn from(args: LeaderboardRequestArgs) -> Self {
        Self {
            filename: args.filename,
            beatmap_md5: args.beatmap_md5,
            mods: Mods::from_bits_retain(args.mods),
            leaderboard_type: LeaderboardType::from(args.leaderboard_type),
            username: args.username,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonalScore {
    /// The requester's best play, with `score` already replaced by its pp.
    pub score: Score,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Leaderboard {
    NotSubmitted,
    Unranked(RankedStatus),
    Ranked {
        beatmap: Beatmap,
        scores: Vec<Score>,
        personal: Option<PersonalScore>,
    },
}

impl Leaderboard {
    /// Encodes the leaderboard in the legacy `getscores` text format.
    pub fn serialize(&self) -> Vec<u8> {
        let (beatmap, scores, personal) = match self {
            Leaderboard::NotSubmitted => return b"0|false".to_vec(),
            Leaderboard::Unranked(status) => return format!("{}|false", status.as_i8()).into_bytes(),
            Leaderboard::Ranked {
                beatmap,
                scores,
                personal,
            } => (beatmap, scores, personal),
        };

        let mut out = String::with_capacity(256 + scores.len() * 96);
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{}|false|{}|{}|{}",
            beatmap.ranked_status().as_i8(),
            beatmap.beatmap_id(),
            beatmap.beatmapset_id(),
            scores.len(),
        );
        out.push_str("0\n");
        let _ = writeln!(
            out,
            "[bold:0,size:20]{}|{}",
            beatmap.display_artist(),
            beatmap.display_title(),
        );
        out.push_str("10.0\n");

        if let Some(personal) = personal {
            write_score_row(&mut out, &personal.score, &personal.score.username, personal.rank);
        }
        out.push('\n');
        for (idx, score) in scores.iter().enumerate() {
            let rank = idx + 1;
            if idx > 0 {
                out.push('\n');
            }
            let name = format!("({rank}) {}", score.username);
            write_score_row(&mut out, score, &name, rank);
        }
        out.into_bytes()
    }
}

fn write_score_row(out: &mut String, score: &Score, name: &str, rank: usize) {
    let stats = &score.statistics;
    let _ = write!(
        out,
        "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
        score.score_id,
        name,
        score.score,
        score.max_combo,
        stats.n50,
        stats.n100,
        stats.n300,
        stats.nmiss,
        stats.nkatu,
        stats.ngeki,
        score.perfect as u8,
        score.mods.bits(),
        score.user_id,
        rank,
        score.time,
        score.has_replay() as u8,
    );
}
