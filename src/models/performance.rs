use crate::models::Mode;
use crate::models::mods::Mods;
use crate::models::scores::{HitStatistics, Score};
use serde::Serialize;

pub struct PerformanceRequest {
    pub mode: Mode,
    pub mods: Mods,
    pub statistics: HitStatistics,
    pub max_combo: u32,
}

impl From<&Score> for PerformanceRequest {
    fn from(score: &Score) -> Self {
        Self {
            mode: score.mode,
            mods: score.mods,
            statistics: score.statistics,
            max_combo: score.max_combo,
        }
    }
}

/// New cached values for a play. Both fields are committed together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceUpdate {
    pub pp: f32,
    /// `None` keeps the stored accuracy.
    pub accuracy: Option<f32>,
}

impl PerformanceUpdate {
    pub const FAILED: Self = Self {
        pp: 0.0,
        accuracy: None,
    };
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecalculationSummary {
    pub profiles: usize,
    pub plays_recalculated: usize,
    pub plays_failed: usize,
}
