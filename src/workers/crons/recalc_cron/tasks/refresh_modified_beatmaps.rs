use crate::common::context::Context;
use crate::common::error::ServiceResult;
use tracing::warn;

/// Picks up edits made to modified beatmap files since they were registered.
/// Returns how many entries were checked.
pub async fn refresh_modified_beatmaps<C: Context>(ctx: &C) -> ServiceResult<usize> {
    let md5s = ctx.beatmaps().fetch_modified_md5s().await;
    for beatmap_md5 in &md5s {
        if let Err(e) = ctx.beatmaps().refresh_content(beatmap_md5).await {
            warn!(
                beatmap_md5 = %beatmap_md5,
                "Keeping stored content of modified beatmap: {}",
                e.message()
            );
        }
    }
    Ok(md5s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::TestContext;
    use crate::models::beatmaps::tests::canonical;
    use crate::models::beatmaps::{Beatmap, ModifiedBeatmap, RankedStatus};

    #[tokio::test]
    async fn changed_files_are_reread_and_missing_ones_kept() {
        let ctx = TestContext::new(vec![]).await;
        let present = ctx.dir.join("present.osu");
        std::fs::write(&present, "edited").unwrap();

        for (md5, path) in [("bbbb", present), ("cccc", ctx.dir.join("gone.osu"))] {
            let beatmap = Beatmap::Modified(ModifiedBeatmap {
                beatmap_md5: md5.to_owned(),
                version: "[Hard 1.2x]".to_owned(),
                file_path: path,
                file_content: "original".to_owned(),
                original: canonical(1, "aaaa", RankedStatus::Ranked),
            });
            ctx.beatmaps.put(md5, beatmap).await.unwrap();
        }
        ctx.beatmaps
            .put(
                "aaaa",
                Beatmap::Canonical(canonical(1, "aaaa", RankedStatus::Ranked)),
            )
            .await
            .unwrap();

        assert_eq!(refresh_modified_beatmaps(&ctx).await.unwrap(), 2);

        let refreshed = ctx.beatmaps.get("bbbb").await.unwrap();
        assert_eq!(refreshed.file_content(), Some("edited"));
        let kept = ctx.beatmaps.get("cccc").await.unwrap();
        assert_eq!(kept.file_content(), Some("original"));
    }
}
