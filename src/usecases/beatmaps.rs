use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::models::beatmaps::{Beatmap, CanonicalBeatmap};
use tracing::{debug, warn};

/// How an original beatmap was identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeatmapIdentity {
    Id(i32),
    Md5(String),
}

/// Registry first, then the catalog. Catalog hits are registered.
pub async fn fetch_by_md5<C: Context>(ctx: &C, beatmap_md5: &str) -> ServiceResult<Beatmap> {
    if let Some(beatmap) = ctx.beatmaps().get(beatmap_md5).await {
        return Ok(beatmap);
    }
    let canonical = fetch_canonical(ctx, &BeatmapIdentity::Md5(beatmap_md5.to_owned())).await?;
    Ok(Beatmap::Canonical(canonical))
}

/// Resolves a canonical beatmap. A modified registry entry under the same md5
/// is never returned.
pub async fn fetch_canonical<C: Context>(
    ctx: &C,
    identity: &BeatmapIdentity,
) -> ServiceResult<CanonicalBeatmap> {
    if let BeatmapIdentity::Md5(beatmap_md5) = identity {
        if let Some(Beatmap::Canonical(beatmap)) = ctx.beatmaps().get(beatmap_md5).await {
            return Ok(beatmap);
        }
    }

    let fetched = match identity {
        BeatmapIdentity::Id(beatmap_id) => ctx.catalog().fetch_by_id(*beatmap_id).await,
        BeatmapIdentity::Md5(beatmap_md5) => ctx.catalog().fetch_by_md5(beatmap_md5).await,
    };
    let canonical = match fetched {
        Ok(Some(beatmap)) => beatmap,
        Ok(None) => {
            debug!(?identity, "Beatmap not found in catalog");
            return Err(AppError::BeatmapsCatalogMiss);
        }
        Err(e) => return unexpected(e),
    };

    match ctx
        .beatmaps()
        .insert_or_existing(Beatmap::Canonical(canonical.clone()))
        .await?
    {
        Beatmap::Canonical(registered) => Ok(registered),
        // The md5 was taken by a modified entry; keep the fetched original.
        Beatmap::Modified(_) => Ok(canonical),
    }
}

/// Downloads the `.osu` file of a canonical beatmap registered without one.
pub async fn with_file_content<C: Context>(ctx: &C, beatmap: Beatmap) -> ServiceResult<Beatmap> {
    let mut canonical = match beatmap {
        Beatmap::Canonical(canonical) if canonical.file_content.is_none() => canonical,
        beatmap => return Ok(beatmap),
    };
    let file_content = match ctx.catalog().fetch_file(&canonical).await {
        Ok(Some(file_content)) => file_content,
        Ok(None) => return Err(AppError::BeatmapsFileUnavailable),
        Err(e) => {
            warn!(
                beatmap_md5 = %canonical.beatmap_md5,
                "Failed to download beatmap file: {e}"
            );
            return Err(AppError::BeatmapsFileUnavailable);
        }
    };

    ctx.beatmaps()
        .store_file_content(&canonical.beatmap_md5, file_content.clone())
        .await?;
    canonical.file_content = Some(file_content);
    Ok(Beatmap::Canonical(canonical))
}

/// The `.osu` content a play is scored against.
pub fn file_content(beatmap: &Beatmap) -> ServiceResult<&str> {
    beatmap
        .file_content()
        .filter(|content| !content.is_empty())
        .ok_or(AppError::BeatmapsFileUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::TestContext;
    use crate::models::beatmaps::RankedStatus;
    use crate::models::beatmaps::tests::canonical;

    #[tokio::test]
    async fn catalog_hits_are_registered() {
        let ctx = TestContext::new(vec![canonical(1234, "aaaa", RankedStatus::Ranked)]).await;

        let first = fetch_by_md5(&ctx, "aaaa").await.unwrap();
        let second = fetch_by_md5(&ctx, "aaaa").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.beatmap_id(), 1234);
        assert_eq!(ctx.catalog_lookups(), 1);
        assert!(ctx.beatmaps.get("aaaa").await.is_some());
    }

    #[tokio::test]
    async fn catalog_miss_is_reported() {
        let ctx = TestContext::new(vec![]).await;
        let err = fetch_canonical(&ctx, &BeatmapIdentity::Id(1)).await.unwrap_err();
        assert_eq!(err, AppError::BeatmapsCatalogMiss);
    }

    #[tokio::test]
    async fn missing_files_are_downloaded_and_stored() {
        let mut served = canonical(1234, "aaaa", RankedStatus::Ranked);
        served.file_content = Some("osu file".to_owned());
        let ctx = TestContext::new(vec![served]).await;
        let registered = Beatmap::Canonical(canonical(1234, "aaaa", RankedStatus::Ranked));
        ctx.beatmaps.put("aaaa", registered.clone()).await.unwrap();

        let beatmap = with_file_content(&ctx, registered).await.unwrap();
        assert_eq!(beatmap.file_content(), Some("osu file"));
        assert_eq!(
            ctx.beatmaps.get("aaaa").await.unwrap().file_content(),
            Some("osu file")
        );

        let stored = ctx.beatmaps.get("aaaa").await.unwrap();
        with_file_content(&ctx, stored).await.unwrap();
        assert_eq!(ctx.file_downloads(), 1);
    }

    #[tokio::test]
    async fn unavailable_files_are_reported() {
        let ctx = TestContext::new(vec![]).await;
        let beatmap = Beatmap::Canonical(canonical(1234, "aaaa", RankedStatus::Ranked));
        assert_eq!(
            with_file_content(&ctx, beatmap).await.unwrap_err(),
            AppError::BeatmapsFileUnavailable
        );
    }

    #[test]
    fn missing_file_content_is_an_error() {
        let beatmap = Beatmap::Canonical(canonical(1, "aaaa", RankedStatus::Ranked));
        assert_eq!(
            file_content(&beatmap).unwrap_err(),
            AppError::BeatmapsFileUnavailable
        );
    }
}
