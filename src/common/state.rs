use crate::adapters::beatmaps_catalog::BeatmapCatalog;
use crate::adapters::performance_calculator::PerformanceCalculator;
use crate::common::context::Context;
use crate::common::paths::PathTranslator;
use crate::repositories::beatmaps::BeatmapRegistry;
use crate::repositories::profiles::ProfileStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub beatmaps: Arc<BeatmapRegistry>,
    pub profiles: Arc<ProfileStore>,
    pub catalog: Arc<dyn BeatmapCatalog>,
    pub calculator: Arc<dyn PerformanceCalculator>,
    pub paths: Arc<dyn PathTranslator>,
    pub modified_index_path: PathBuf,
    pub current_profile: Option<String>,
}

impl Context for AppState {
    fn beatmaps(&self) -> &BeatmapRegistry {
        &self.beatmaps
    }

    fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    fn catalog(&self) -> &dyn BeatmapCatalog {
        self.catalog.as_ref()
    }

    fn calculator(&self) -> Arc<dyn PerformanceCalculator> {
        self.calculator.clone()
    }

    fn paths(&self) -> &dyn PathTranslator {
        self.paths.as_ref()
    }

    fn modified_index_path(&self) -> &Path {
        &self.modified_index_path
    }

    fn current_profile(&self) -> Option<&str> {
        self.current_profile.as_deref()
    }
}
