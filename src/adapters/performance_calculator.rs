use crate::models::Mode;
use crate::models::performance::PerformanceRequest;
use rosu_pp::model::mode::GameMode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceResult {
    pub pp: f32,
    pub accuracy: f32,
}

/// Scores a play against a beatmap file. Must be deterministic.
pub trait PerformanceCalculator: Send + Sync {
    fn calculate(
        &self,
        request: &PerformanceRequest,
        beatmap_file: &[u8],
    ) -> anyhow::Result<PerformanceResult>;
}

/// Stable (non-lazer) pp via rosu-pp.
pub struct RosuCalculator;

impl PerformanceCalculator for RosuCalculator {
    fn calculate(
        &self,
        request: &PerformanceRequest,
        beatmap_file: &[u8],
    ) -> anyhow::Result<PerformanceResult> {
        let beatmap = rosu_pp::Beatmap::from_bytes(beatmap_file)?;
        if beatmap.hit_objects.is_empty() {
            anyhow::bail!("beatmap has no hit objects");
        }
        let stats = &request.statistics;
        let attributes = rosu_pp::Performance::new(&beatmap)
            .mode_or_ignore(game_mode(request.mode))
            .lazer(false)
            .mods(request.mods.bits())
            .combo(request.max_combo)
            .n300(stats.n300)
            .n100(stats.n100)
            .n50(stats.n50)
            .misses(stats.nmiss)
            .n_katu(stats.nkatu)
            .n_geki(stats.ngeki)
            .calculate();

        let pp = attributes.pp();
        if !pp.is_finite() {
            anyhow::bail!("calculated pp is not finite: {pp}");
        }
        Ok(PerformanceResult {
            pp: pp as f32,
            accuracy: stats.accuracy(request.mode),
        })
    }
}

const fn game_mode(mode: Mode) -> GameMode {
    match mode {
        Mode::Standard => GameMode::Osu,
        Mode::Taiko => GameMode::Taiko,
        Mode::Catch => GameMode::Catch,
        Mode::Mania => GameMode::Mania,
    }
}
