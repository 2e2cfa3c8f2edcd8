use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult};
use crate::common::paths::client_file_name;
use crate::models::beatmaps::{Beatmap, ModifiedBeatmap};
use crate::repositories::modified_index;
use crate::usecases::beatmaps::{self, BeatmapIdentity};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Ways of recovering the original beatmap, tried in order.
#[derive(Debug, Clone, Copy)]
enum IdentityStrategy {
    EmbeddedBeatmapId,
    SiblingFile,
}

const IDENTITY_STRATEGIES: [IdentityStrategy; 2] = [
    IdentityStrategy::EmbeddedBeatmapId,
    IdentityStrategy::SiblingFile,
];

struct ModifiedFile<'a> {
    requested_filename: &'a str,
    path: &'a Path,
    content: &'a str,
}

impl IdentityStrategy {
    async fn recover(self, file: &ModifiedFile<'_>) -> Option<BeatmapIdentity> {
        match self {
            Self::EmbeddedBeatmapId => embedded_beatmap_id(file.content).map(BeatmapIdentity::Id),
            Self::SiblingFile => sibling_beatmap_md5(file.path, file.requested_filename)
                .await
                .map(BeatmapIdentity::Md5),
        }
    }
}

/// Resolves a locally modified beatmap to a registry entry linked to the
/// canonical beatmap it was made from.
pub async fn resolve<C: Context>(
    ctx: &C,
    filename: &str,
    beatmap_md5: &str,
) -> ServiceResult<Beatmap> {
    if let Some(beatmap) = ctx.beatmaps().get(beatmap_md5).await {
        return Ok(beatmap);
    }

    let index = match modified_index::fetch_all(ctx.modified_index_path()).await {
        Ok(index) => index,
        Err(e) => {
            warn!(
                path = %ctx.modified_index_path().display(),
                "Failed to read modified beatmaps index: {e}"
            );
            return Err(AppError::BeatmapsUnresolved);
        }
    };
    let Some(entry) = index
        .iter()
        .find(|entry| client_file_name(&entry.client_path) == filename)
    else {
        debug!(filename, "Beatmap is not in the modified beatmaps index");
        return Err(AppError::BeatmapsUnresolved);
    };

    let file_path = match ctx.paths().to_local(&entry.client_path).await {
        Ok(file_path) => file_path,
        Err(e) => {
            warn!(path = %entry.client_path, "Failed to translate client path: {e}");
            return Err(AppError::BeatmapsUnresolved);
        }
    };
    let bytes = match tokio::fs::read(&file_path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(path = %file_path.display(), "Modified beatmap file is unreadable: {e}");
            return Err(AppError::BeatmapsUnresolved);
        }
    };
    let content = String::from_utf8_lossy(&bytes).into_owned();

    let file = ModifiedFile {
        requested_filename: filename,
        path: &file_path,
        content: &content,
    };
    let Some(identity) = recover_identity(&file).await else {
        debug!(filename, "Could not identify the original beatmap");
        return Err(AppError::BeatmapsUnresolved);
    };

    let original = beatmaps::fetch_canonical(ctx, &identity).await?;
    let version = derive_version(filename, &original.version);
    info!(
        beatmap_md5,
        original_md5 = %original.beatmap_md5,
        version = %version,
        "Resolved modified beatmap"
    );

    let beatmap = Beatmap::Modified(ModifiedBeatmap {
        beatmap_md5: beatmap_md5.to_owned(),
        version,
        file_path,
        file_content: content,
        original,
    });
    ctx.beatmaps().insert_or_existing(beatmap).await
}

async fn recover_identity(file: &ModifiedFile<'_>) -> Option<BeatmapIdentity> {
    for strategy in IDENTITY_STRATEGIES {
        if let Some(identity) = strategy.recover(file).await {
            debug!(?strategy, ?identity, "Recovered original beatmap identity");
            return Some(identity);
        }
    }
    None
}

/// First positive `BeatmapID:` value in the file.
fn embedded_beatmap_id(content: &str) -> Option<i32> {
    content.lines().find_map(|line| {
        let (key, value) = line.trim().split_once(':')?;
        if !key.eq_ignore_ascii_case("beatmapid") {
            return None;
        }
        value.trim().parse::<i32>().ok().filter(|id| *id > 0)
    })
}

/// md5 of the first `.osu` next to `path` whose name, minus the extension and
/// a closing `]`, is contained in the requested filename.
async fn sibling_beatmap_md5(path: &Path, requested_filename: &str) -> Option<String> {
    let sibling = find_sibling(path.parent()?, requested_filename).await?;
    match tokio::fs::read(&sibling).await {
        Ok(bytes) => Some(format!("{:x}", md5::compute(&bytes))),
        Err(e) => {
            debug!(path = %sibling.display(), "Failed to read sibling beatmap: {e}");
            None
        }
    }
}

async fn find_sibling(directory: &Path, requested_filename: &str) -> Option<PathBuf> {
    let requested = requested_filename.to_lowercase();
    let mut entries = tokio::fs::read_dir(directory).await.ok()?;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        let lowered = file_name.to_lowercase();
        let Some(stem) = lowered.strip_suffix(".osu") else {
            continue;
        };
        if lowered == requested {
            continue;
        }
        let stem = stem.strip_suffix(']').unwrap_or(stem);
        if requested.contains(stem) {
            return Some(entry.path());
        }
    }
    None
}

/// `[<original version><what the filename adds after it>`, e.g. `Hard` and
/// `A - B (m) [Hard 1.2x].osu` give `[Hard 1.2x]`.
fn derive_version(filename: &str, original_version: &str) -> String {
    let filename = filename.to_lowercase();
    let token: String = original_version
        .chars()
        .filter(|c| c.is_alphabetic() || *c == ' ')
        .flat_map(char::to_lowercase)
        .collect();
    if token.is_empty() {
        return format!("[{original_version}]");
    }

    // Without a match the whole filename is the remainder.
    let remainder = filename
        .rsplit_once(token.as_str())
        .map_or(filename.as_str(), |(_, remainder)| remainder);
    let remainder = remainder.strip_suffix(".osu").unwrap_or(remainder);
    format!("[{original_version}{remainder}")
}
