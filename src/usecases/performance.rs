use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::models::performance::{PerformanceRequest, PerformanceUpdate, RecalculationSummary};
use crate::models::scores::Score;
use crate::repositories::profiles::{PlayBucket, PlayKey};
use crate::usecases::beatmaps;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Scores one play against its beatmap. Only the registry and the catalog are
/// consulted; modified beatmaps must already be registered.
pub async fn calculate<C: Context>(ctx: &C, score: &Score) -> ServiceResult<PerformanceUpdate> {
    let beatmap = beatmaps::fetch_by_md5(ctx, &score.beatmap_md5).await?;
    let beatmap = beatmaps::with_file_content(ctx, beatmap).await?;
    let file_content = beatmaps::file_content(&beatmap)?.to_owned();

    let request = PerformanceRequest::from(score);
    let calculator = ctx.calculator();
    let calculated = tokio::task::spawn_blocking(move || {
        calculator.calculate(&request, file_content.as_bytes())
    })
    .await;
    let calculated = match calculated {
        Ok(calculated) => calculated,
        Err(e) => return unexpected(e),
    };
    match calculated {
        Ok(result) => Ok(PerformanceUpdate {
            pp: result.pp,
            accuracy: Some(result.accuracy),
        }),
        Err(e) => {
            warn!(
                beatmap_md5 = %score.beatmap_md5,
                score_id = score.score_id,
                "Failed to calculate performance: {e}"
            );
            Err(AppError::PerformanceScoringFailed)
        }
    }
}

/// Recomputes pp and accuracy of every play on a ranked or approved beatmap,
/// then writes all profiles once.
pub async fn recalculate_all<C: Context>(ctx: &C) -> ServiceResult<RecalculationSummary> {
    let start = Instant::now();
    let mut summary = RecalculationSummary::default();
    let names = ctx.profiles().fetch_names().await;

    for (profile_idx, name) in names.iter().enumerate() {
        summary.profiles += 1;
        for (bucket_idx, bucket) in PlayBucket::PERFORMANCE.into_iter().enumerate() {
            let beatmap_md5s = ctx.profiles().fetch_beatmap_md5s(name, bucket).await;
            for (map_idx, beatmap_md5) in beatmap_md5s.iter().enumerate() {
                let plays = ctx.profiles().fetch_plays(name, bucket, beatmap_md5).await;
                for (play_idx, play) in plays.into_iter().enumerate() {
                    info!(
                        profile = %name,
                        bucket = bucket.name(),
                        "Recalculating profile {}/{}, bucket {}/{}, map {}/{}, play {}",
                        profile_idx + 1,
                        names.len(),
                        bucket_idx + 1,
                        PlayBucket::PERFORMANCE.len(),
                        map_idx + 1,
                        beatmap_md5s.len(),
                        play_idx + 1,
                    );

                    let key = PlayKey {
                        profile: name,
                        bucket,
                        beatmap_md5,
                        index: play_idx,
                        time: play.time,
                    };
                    let score = Score::from(play);
                    let update = match calculate(ctx, &score).await {
                        Ok(update) => {
                            summary.plays_recalculated += 1;
                            update
                        }
                        Err(e) => {
                            debug!(
                                beatmap_md5 = %beatmap_md5,
                                score_id = score.score_id,
                                "Play has no performance: {}",
                                e.message()
                            );
                            summary.plays_failed += 1;
                            PerformanceUpdate::FAILED
                        }
                    };
                    if !ctx.profiles().commit_performance(key, update).await {
                        warn!(
                            profile = %name,
                            beatmap_md5 = %beatmap_md5,
                            "Play changed during recalculation; skipped"
                        );
                    }
                }
            }
        }
    }

    if let Err(e) = ctx.profiles().flush().await {
        return unexpected(e);
    }
    info!(
        profiles = summary.profiles,
        recalculated = summary.plays_recalculated,
        failed = summary.plays_failed,
        elapsed_ms = start.elapsed().as_millis(),
        "Recalculation finished"
    );
    Ok(summary)
}
