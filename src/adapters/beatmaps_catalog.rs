use crate::models::beatmaps::{CanonicalBeatmap, RankedStatus};
use crate::settings::AppSettings;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Source of canonical (officially submitted) beatmaps.
#[async_trait]
pub trait BeatmapCatalog: Send + Sync {
    async fn fetch_by_id(&self, beatmap_id: i32) -> anyhow::Result<Option<CanonicalBeatmap>>;
    async fn fetch_by_md5(&self, beatmap_md5: &str) -> anyhow::Result<Option<CanonicalBeatmap>>;
    /// The `.osu` file of `beatmap`, or `None` if the served file no longer
    /// matches its md5.
    async fn fetch_file(&self, beatmap: &CanonicalBeatmap) -> anyhow::Result<Option<String>>;
}

/// osu! api v1 (`/api/get_beatmaps`), plus the raw `.osu` download.
pub struct OsuApiCatalog {
    client: reqwest::Client,
    api_base_url: String,
    api_key: String,
    files_base_url: String,
}

impl OsuApiCatalog {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base_url: settings.osu_api_base_url.clone(),
            api_key: settings.osu_api_key.clone(),
            files_base_url: settings.osu_files_base_url.clone(),
        }
    }

    async fn lookup(&self, query: BeatmapLookupQuery<'_>) -> anyhow::Result<Option<CanonicalBeatmap>> {
        let url = format!("{}/api/get_beatmaps", self.api_base_url);
        let response = self
            .client
            .get(url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?;
        let beatmaps: Vec<OsuApiBeatmap> = response.json().await?;
        let Some(beatmap) = beatmaps.into_iter().next() else {
            return Ok(None);
        };

        let mut beatmap = CanonicalBeatmap::try_from(beatmap)?;
        // A failed download is retried when the beatmap is next scored.
        beatmap.file_content = match self.fetch_file(&beatmap).await {
            Ok(file_content) => file_content,
            Err(e) => {
                warn!(
                    beatmap_id = beatmap.beatmap_id,
                    "Failed to download beatmap file: {e}"
                );
                None
            }
        };
        Ok(Some(beatmap))
    }
}

#[async_trait]
impl BeatmapCatalog for OsuApiCatalog {
    async fn fetch_by_id(&self, beatmap_id: i32) -> anyhow::Result<Option<CanonicalBeatmap>> {
        self.lookup(BeatmapLookupQuery {
            k: &self.api_key,
            b: Some(beatmap_id),
            h: None,
            limit: 1,
        })
        .await
    }

    async fn fetch_by_md5(&self, beatmap_md5: &str) -> anyhow::Result<Option<CanonicalBeatmap>> {
        self.lookup(BeatmapLookupQuery {
            k: &self.api_key,
            b: None,
            h: Some(beatmap_md5),
            limit: 1,
        })
        .await
    }

    async fn fetch_file(&self, beatmap: &CanonicalBeatmap) -> anyhow::Result<Option<String>> {
        let url = format!("{}/{}", self.files_base_url, beatmap.beatmap_id);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        let downloaded_md5 = format!("{:x}", md5::compute(&bytes));
        if downloaded_md5 != beatmap.beatmap_md5 {
            warn!(
                beatmap_id = beatmap.beatmap_id,
                expected = %beatmap.beatmap_md5,
                downloaded = %downloaded_md5,
                "Downloaded beatmap file does not match"
            );
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

#[derive(Serialize)]
struct BeatmapLookupQuery<'a> {
    k: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    b: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    h: Option<&'a str>,
    limit: u8,
}

/// The v1 api encodes every number as a string.
#[derive(Deserialize)]
struct OsuApiBeatmap {
    beatmap_id: String,
    beatmapset_id: String,
    file_md5: String,
    approved: String,
    title: String,
    artist: String,
    title_unicode: Option<String>,
    artist_unicode: Option<String>,
    version: String,
    max_combo: Option<String>,
}

impl TryFrom<OsuApiBeatmap> for CanonicalBeatmap {
    type Error = anyhow::Error;

    fn try_from(value: OsuApiBeatmap) -> anyhow::Result<Self> {
        let max_combo = match value.max_combo.as_deref() {
            Some(max_combo) => max_combo.parse()?,
            None => 0,
        };
        Ok(Self {
            beatmap_id: value.beatmap_id.parse()?,
            beatmapset_id: value.beatmapset_id.parse()?,
            beatmap_md5: value.file_md5,
            ranked_status: RankedStatus::from_osu_api(value.approved.parse()?),
            title: value.title,
            artist: value.artist,
            title_unicode: value.title_unicode.filter(|title| !title.is_empty()),
            artist_unicode: value.artist_unicode.filter(|artist| !artist.is_empty()),
            version: value.version,
            max_combo,
            file_content: None,
        })
    }
}
