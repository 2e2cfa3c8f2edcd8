use crate::adapters::beatmaps_catalog::BeatmapCatalog;
use crate::adapters::performance_calculator::PerformanceCalculator;
use crate::common::paths::PathTranslator;
use crate::repositories::beatmaps::BeatmapRegistry;
use crate::repositories::profiles::ProfileStore;
use std::path::Path;
use std::sync::Arc;

pub trait Context: Sync + Send {
    fn beatmaps(&self) -> &BeatmapRegistry;
    fn profiles(&self) -> &ProfileStore;
    fn catalog(&self) -> &dyn BeatmapCatalog;
    fn calculator(&self) -> Arc<dyn PerformanceCalculator>;
    fn paths(&self) -> &dyn PathTranslator;
    fn modified_index_path(&self) -> &Path;
    /// Profile of the local player, if configured.
    fn current_profile(&self) -> Option<&str>;
}
