use crate::adapters::beatmaps_catalog::OsuApiCatalog;
use crate::adapters::performance_calculator::RosuCalculator;
use crate::common::paths::{NativePaths, PathTranslator, WslPaths};
use crate::common::state::AppState;
use crate::repositories::beatmaps::BeatmapRegistry;
use crate::repositories::profiles::ProfileStore;
use crate::settings::AppSettings;
use std::sync::Arc;
use tracing::info;

pub fn initialize_logging(settings: &AppSettings) {
    tracing_subscriber::fmt()
        .with_max_level(settings.level)
        .with_timer(tracing_subscriber::fmt::time())
        .with_level(true)
        .compact()
        .init();
}

pub async fn initialize_state(settings: &AppSettings) -> anyhow::Result<AppState> {
    let beatmaps = BeatmapRegistry::load(settings.beatmaps_path()).await?;
    let profiles = ProfileStore::load(settings.profiles_path()).await?;
    let (beatmap_count, profile_count) = (beatmaps.len().await, profiles.len().await);
    info!(
        beatmaps = beatmap_count,
        profiles = profile_count,
        "Loaded local data from {}",
        settings.data_dir.display(),
    );

    let paths: Arc<dyn PathTranslator> = if settings.using_wsl {
        Arc::new(WslPaths)
    } else {
        Arc::new(NativePaths)
    };

    Ok(AppState {
        beatmaps: Arc::new(beatmaps),
        profiles: Arc::new(profiles),
        catalog: Arc::new(OsuApiCatalog::new(settings)),
        calculator: Arc::new(RosuCalculator),
        paths,
        modified_index_path: settings.modified_index_path.clone(),
        current_profile: settings.current_profile.clone(),
    })
}
