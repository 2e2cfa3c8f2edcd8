use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::common::json_file::JsonFile;
use crate::entities::beatmaps::BeatmapRecord;
use crate::models::beatmaps::Beatmap;
use hashbrown::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Beatmaps resolved so far, keyed by the md5 of their `.osu` file.
///
/// Entries are only ever added. The check-then-insert of [`BeatmapRegistry::put`]
/// happens inside one write lock, and the lock is never held across file I/O.
pub struct BeatmapRegistry {
    beatmaps: RwLock<HashMap<String, Beatmap>>,
    file: JsonFile,
}

impl BeatmapRegistry {
    pub async fn load(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let file = JsonFile::new(path);
        let records: HashMap<String, BeatmapRecord> = file.load().await?;

        let mut beatmaps = HashMap::with_capacity(records.len());
        for (md5, record) in records {
            match Beatmap::try_from(record) {
                Ok(beatmap) => {
                    beatmaps.insert(md5, beatmap);
                }
                Err(e) => warn!(beatmap_md5 = md5, "Skipping invalid registry entry: {e}"),
            }
        }

        Ok(Self {
            beatmaps: RwLock::new(beatmaps),
            file,
        })
    }

    pub async fn get(&self, beatmap_md5: &str) -> Option<Beatmap> {
        self.beatmaps.read().await.get(beatmap_md5).cloned()
    }

    pub async fn len(&self) -> usize {
        self.beatmaps.read().await.len()
    }

    pub async fn fetch_modified_md5s(&self) -> Vec<String> {
        let beatmaps = self.beatmaps.read().await;
        let mut md5s: Vec<String> = beatmaps
            .iter()
            .filter(|(_, beatmap)| beatmap.is_modified())
            .map(|(md5, _)| md5.clone())
            .collect();
        md5s.sort();
        md5s
    }

    /// Registers a beatmap and flushes the registry to disk.
    /// Fails with [`AppError::BeatmapsDuplicateKey`] if the md5 is taken.
    pub async fn put(&self, beatmap_md5: &str, beatmap: Beatmap) -> ServiceResult<()> {
        {
            let mut beatmaps = self.beatmaps.write().await;
            if beatmaps.contains_key(beatmap_md5) {
                return Err(AppError::BeatmapsDuplicateKey);
            }
            beatmaps.insert(beatmap_md5.to_owned(), beatmap);
        }
        info!(beatmap_md5, "Registered beatmap");

        match self.flush().await {
            Ok(()) => Ok(()),
            Err(e) => unexpected(e),
        }
    }

    /// Registers `beatmap` under its own md5, or returns the entry that won
    /// the race to register it first.
    pub async fn insert_or_existing(&self, beatmap: Beatmap) -> ServiceResult<Beatmap> {
        let beatmap_md5 = beatmap.beatmap_md5().to_owned();
        match self.put(&beatmap_md5, beatmap.clone()).await {
            Ok(()) => Ok(beatmap),
            Err(AppError::BeatmapsDuplicateKey) => self
                .get(&beatmap_md5)
                .await
                .ok_or(AppError::BeatmapsDuplicateKey),
            Err(e) => Err(e),
        }
    }

    /// Stores a downloaded `.osu` file on a canonical entry that has none.
    pub async fn store_file_content(
        &self,
        beatmap_md5: &str,
        file_content: String,
    ) -> ServiceResult<()> {
        {
            let mut beatmaps = self.beatmaps.write().await;
            match beatmaps.get_mut(beatmap_md5) {
                Some(Beatmap::Canonical(entry)) if entry.file_content.is_none() => {
                    entry.file_content = Some(file_content);
                }
                _ => return Ok(()),
            }
        }
        info!(beatmap_md5, "Stored beatmap file");

        match self.flush().await {
            Ok(()) => Ok(()),
            Err(e) => unexpected(e),
        }
    }

    /// Re-reads the backing file of a modified beatmap and stores its content
    /// if it changed. Canonical beatmaps are returned untouched.
    pub async fn refresh_content(&self, beatmap_md5: &str) -> ServiceResult<Option<Beatmap>> {
        let Some(beatmap) = self.get(beatmap_md5).await else {
            return Ok(None);
        };
        let Beatmap::Modified(modified) = &beatmap else {
            return Ok(Some(beatmap));
        };

        let bytes = match tokio::fs::read(&modified.file_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(
                    beatmap_md5,
                    path = %modified.file_path.display(),
                    "Failed to re-read modified beatmap: {e}"
                );
                return Err(AppError::BeatmapsFileUnavailable);
            }
        };
        let file_content = String::from_utf8_lossy(&bytes).into_owned();
        if file_content == modified.file_content {
            return Ok(Some(beatmap));
        }

        let refreshed = {
            let mut beatmaps = self.beatmaps.write().await;
            match beatmaps.get_mut(beatmap_md5) {
                Some(Beatmap::Modified(entry)) => {
                    entry.file_content = file_content;
                    Beatmap::Modified(entry.clone())
                }
                other => return Ok(other.map(|beatmap| beatmap.clone())),
            }
        };
        info!(beatmap_md5, "Refreshed modified beatmap content");

        match self.flush().await {
            Ok(()) => Ok(Some(refreshed)),
            Err(e) => unexpected(e),
        }
    }

    async fn flush(&self) -> anyhow::Result<()> {
        let _guard = self.file.lock().await;
        let snapshot: HashMap<String, BeatmapRecord> = {
            let beatmaps = self.beatmaps.read().await;
            beatmaps
                .iter()
                .map(|(md5, beatmap)| (md5.clone(), BeatmapRecord::from(beatmap)))
                .collect()
        };
        self.file.store(&snapshot).await
    }
}
