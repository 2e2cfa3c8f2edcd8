use crate::entities::scores::ScoreEntity;
use crate::models::Mode;
use crate::models::mods::Mods;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitStatistics {
    pub n300: u32,
    pub n100: u32,
    pub n50: u32,
    pub nmiss: u32,
    pub nkatu: u32,
    pub ngeki: u32,
}

impl HitStatistics {
    /// Accuracy in percent, using the stable formula of each mode.
    pub fn accuracy(&self, mode: Mode) -> f32 {
        let (n300, n100, n50, nmiss, nkatu, ngeki) = (
            self.n300 as f64,
            self.n100 as f64,
            self.n50 as f64,
            self.nmiss as f64,
            self.nkatu as f64,
            self.ngeki as f64,
        );
        let (hit, total) = match mode {
            Mode::Standard => (
                300.0 * n300 + 100.0 * n100 + 50.0 * n50,
                300.0 * (n300 + n100 + n50 + nmiss),
            ),
            Mode::Taiko => (n300 + 0.5 * n100, n300 + n100 + nmiss),
            // n50 counts small droplets, nkatu counts missed droplets
            Mode::Catch => (n300 + n100 + n50, n300 + n100 + n50 + nkatu + nmiss),
            Mode::Mania => (
                300.0 * (ngeki + n300) + 200.0 * nkatu + 100.0 * n100 + 50.0 * n50,
                300.0 * (ngeki + n300 + nkatu + n100 + n50 + nmiss),
            ),
        };
        if total <= 0.0 {
            return 0.0;
        }
        (hit / total * 100.0) as f32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub score_id: i64,
    pub user_id: i64,
    pub username: String,
    pub beatmap_md5: String,
    pub mode: Mode,
    pub mods: Mods,
    pub score: i64,
    pub statistics: HitStatistics,
    pub max_combo: u32,
    pub perfect: bool,
    pub time: i64,
    pub performance: f32,
    pub accuracy: f32,
    pub replay: Option<String>,
}

impl Score {
    pub fn played_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time, 0)
    }

    pub fn has_replay(&self) -> bool {
        self.replay.as_deref().is_some_and(|replay| !replay.is_empty())
    }
}

impl From<ScoreEntity> for Score {
    fn from(value: ScoreEntity) -> Self {
        Self {
            score_id: value.id,
            user_id: value.user_id,
            username: value.name,
            beatmap_md5: value.md5,
            mode: Mode::try_from(value.mode).unwrap_or_default(),
            mods: Mods::from_bits_retain(value.mods),
            score: value.score,
            statistics: HitStatistics {
                n300: value.n300,
                n100: value.n100,
                n50: value.n50,
                nmiss: value.nmiss,
                nkatu: value.nkatu,
                ngeki: value.ngeki,
            },
            max_combo: value.max_combo,
            perfect: value.perfect,
            time: value.time,
            performance: value.pp,
            accuracy: value.acc,
            replay: value.replay_frames,
        }
    }
}

impl From<Score> for ScoreEntity {
    fn from(value: Score) -> Self {
        Self {
            id: value.score_id,
            name: value.username,
            user_id: value.user_id,
            md5: value.beatmap_md5,
            mode: value.mode as u8,
            mods: value.mods.bits(),
            score: value.score,
            n300: value.statistics.n300,
            n100: value.statistics.n100,
            n50: value.statistics.n50,
            nmiss: value.statistics.nmiss,
            nkatu: value.statistics.nkatu,
            ngeki: value.statistics.ngeki,
            max_combo: value.max_combo,
            perfect: value.perfect,
            time: value.time,
            pp: value.performance,
            acc: value.accuracy,
            replay_frames: value.replay,
        }
    }
}
