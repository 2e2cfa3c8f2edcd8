use crate::adapters::beatmaps_catalog::BeatmapCatalog;
use crate::adapters::performance_calculator::{PerformanceCalculator, PerformanceResult};
use crate::common::context::Context;
use crate::common::json_file::tests::scratch_dir;
use crate::common::paths::{NativePaths, PathTranslator};
use crate::common::state::AppState;
use crate::models::beatmaps::CanonicalBeatmap;
use crate::models::performance::PerformanceRequest;
use crate::repositories::beatmaps::BeatmapRegistry;
use crate::repositories::profiles::ProfileStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct FakeCatalog {
    pub beatmaps: Vec<CanonicalBeatmap>,
    pub lookups: AtomicUsize,
    pub downloads: AtomicUsize,
}

#[async_trait]
impl BeatmapCatalog for FakeCatalog {
    async fn fetch_by_id(&self, beatmap_id: i32) -> anyhow::Result<Option<CanonicalBeatmap>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .beatmaps
            .iter()
            .find(|beatmap| beatmap.beatmap_id == beatmap_id)
            .cloned())
    }

    async fn fetch_by_md5(&self, beatmap_md5: &str) -> anyhow::Result<Option<CanonicalBeatmap>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .beatmaps
            .iter()
            .find(|beatmap| beatmap.beatmap_md5 == beatmap_md5)
            .cloned())
    }

    async fn fetch_file(&self, beatmap: &CanonicalBeatmap) -> anyhow::Result<Option<String>> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .beatmaps
            .iter()
            .find(|known| known.beatmap_md5 == beatmap.beatmap_md5)
            .and_then(|known| known.file_content.clone()))
    }
}

/// pp = number of 300s, accuracy = 90. Files containing `broken` fail.
pub struct FakeCalculator;

impl PerformanceCalculator for FakeCalculator {
    fn calculate(
        &self,
        request: &PerformanceRequest,
        beatmap_file: &[u8],
    ) -> anyhow::Result<PerformanceResult> {
        if beatmap_file.windows(6).any(|window| window == b"broken") {
            anyhow::bail!("unreadable beatmap");
        }
        Ok(PerformanceResult {
            pp: request.statistics.n300 as f32,
            accuracy: 90.0,
        })
    }
}

pub struct TestContext {
    pub dir: PathBuf,
    pub beatmaps: BeatmapRegistry,
    pub profiles: ProfileStore,
    pub catalog: FakeCatalog,
    pub calculator: Arc<FakeCalculator>,
    pub paths: NativePaths,
    pub modified_index_path: PathBuf,
    pub current_profile: Option<String>,
}

impl TestContext {
    pub async fn new(catalog: Vec<CanonicalBeatmap>) -> Self {
        let dir = scratch_dir();
        Self {
            beatmaps: BeatmapRegistry::load(dir.join("beatmaps.json")).await.unwrap(),
            profiles: ProfileStore::load(dir.join("profiles.json")).await.unwrap(),
            catalog: FakeCatalog {
                beatmaps: catalog,
                ..Default::default()
            },
            calculator: Arc::new(FakeCalculator),
            paths: NativePaths,
            modified_index_path: dir.join("modified.txt"),
            current_profile: Some("me".to_owned()),
            dir,
        }
    }

    pub fn catalog_lookups(&self) -> usize {
        self.catalog.lookups.load(Ordering::SeqCst)
    }

    pub fn file_downloads(&self) -> usize {
        self.catalog.downloads.load(Ordering::SeqCst)
    }
}

impl Context for TestContext {
    fn beatmaps(&self) -> &BeatmapRegistry {
        &self.beatmaps
    }

    fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    fn catalog(&self) -> &dyn BeatmapCatalog {
        &self.catalog
    }

    fn calculator(&self) -> Arc<dyn PerformanceCalculator> {
        self.calculator.clone()
    }

    fn paths(&self) -> &dyn PathTranslator {
        &self.paths
    }

    fn modified_index_path(&self) -> &Path {
        &self.modified_index_path
    }

    fn current_profile(&self) -> Option<&str> {
        self.current_profile.as_deref()
    }
}

/// An `AppState` over the same fakes, for driving the router.
pub async fn test_state(catalog: Vec<CanonicalBeatmap>) -> AppState {
    let dir = scratch_dir();
    AppState {
        beatmaps: Arc::new(BeatmapRegistry::load(dir.join("beatmaps.json")).await.unwrap()),
        profiles: Arc::new(ProfileStore::load(dir.join("profiles.json")).await.unwrap()),
        catalog: Arc::new(FakeCatalog {
            beatmaps: catalog,
            ..Default::default()
        }),
        calculator: Arc::new(FakeCalculator),
        paths: Arc::new(NativePaths),
        modified_index_path: dir.join("modified.txt"),
        current_profile: Some("me".to_owned()),
    }
}
