use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::models::profiles::{PlayResponse, ProfileStats};
use crate::models::scores::Score;
use crate::repositories::profiles::PlayBucket;
use hashbrown::HashMap;
use tracing::info;

const PP_WEIGHT: f32 = 0.95;

async fn ensure_exists<C: Context>(ctx: &C, name: &str) -> ServiceResult<()> {
    match ctx.profiles().exists(name).await {
        true => Ok(()),
        false => Err(AppError::ProfilesNotFound),
    }
}

/// Best play per beatmap across the performance buckets, highest pp first.
async fn best_plays<C: Context>(ctx: &C, name: &str) -> Vec<Score> {
    let mut best: HashMap<String, Score> = HashMap::new();
    for bucket in PlayBucket::PERFORMANCE {
        for play in ctx.profiles().fetch_bucket_plays(name, bucket).await {
            let score = Score::from(play);
            match best.get(&score.beatmap_md5) {
                Some(current) if current.performance >= score.performance => {}
                _ => {
                    best.insert(score.beatmap_md5.clone(), score);
                }
            }
        }
    }
    let mut plays: Vec<Score> = best.into_values().collect();
    plays.sort_by(|a, b| {
        b.performance
            .total_cmp(&a.performance)
            .then_with(|| a.time.cmp(&b.time))
    });
    plays
}

fn weighted_pp(plays: &[Score]) -> f32 {
    plays
        .iter()
        .zip(std::iter::successors(Some(1.0f32), |weight| Some(weight * PP_WEIGHT)))
        .map(|(play, weight)| play.performance * weight)
        .sum()
}

pub async fn fetch_stats<C: Context>(ctx: &C, name: &str) -> ServiceResult<ProfileStats> {
    let Some(profile) = ctx.profiles().fetch_one(name).await else {
        return Err(AppError::ProfilesNotFound);
    };
    let playcount = profile.plays.all_plays.len();
    let pp = weighted_pp(&best_plays(ctx, name).await);
    Ok(ProfileStats {
        name: name.to_owned(),
        playcount,
        pp,
    })
}

/// Attaches the registered beatmap, if any, to each play.
async fn decorate<C: Context>(ctx: &C, plays: Vec<Score>) -> Vec<PlayResponse> {
    let mut decorated = Vec::with_capacity(plays.len());
    for play in plays {
        let beatmap = ctx.beatmaps().get(&play.beatmap_md5).await;
        decorated.push(PlayResponse::new(play, beatmap.as_ref()));
    }
    decorated
}

pub async fn fetch_tops<C: Context>(
    ctx: &C,
    name: &str,
    limit: usize,
) -> ServiceResult<Vec<PlayResponse>> {
    ensure_exists(ctx, name).await?;
    let mut plays = best_plays(ctx, name).await;
    plays.truncate(limit);
    Ok(decorate(ctx, plays).await)
}

pub async fn fetch_recent<C: Context>(
    ctx: &C,
    name: &str,
    limit: usize,
) -> ServiceResult<Vec<PlayResponse>> {
    let Some(plays) = ctx.profiles().fetch_all_plays(name).await else {
        return Err(AppError::ProfilesNotFound);
    };
    let mut plays: Vec<Score> = plays.into_iter().map(Score::from).collect();
    plays.sort_by(|a, b| b.time.cmp(&a.time));
    plays.truncate(limit);
    Ok(decorate(ctx, plays).await)
}

pub async fn wipe<C: Context>(ctx: &C, name: &str) -> ServiceResult<()> {
    if !ctx.profiles().wipe(name).await {
        return Err(AppError::ProfilesNotFound);
    }
    if let Err(e) = ctx.profiles().flush().await {
        return unexpected(e);
    }
    info!(profile = name, "Wiped profile");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::TestContext;
    use crate::entities::scores::ScoreEntity;
    use crate::models::beatmaps::tests::canonical;
    use crate::models::beatmaps::{Beatmap, RankedStatus};
    use crate::models::mods::Mods;
    use crate::models::scores::tests::score;
    use crate::repositories::profiles::ProfileStore;
    use crate::repositories::profiles::tests::profile_with;

    async fn context_with_plays() -> TestContext {
        let ctx = TestContext::new(vec![]).await;
        let plays = vec![
            ScoreEntity::from(score(1, "aaaa", 500, 100.0)),
            ScoreEntity::from(score(2, "aaaa", 900, 200.0)),
            ScoreEntity::from(Score {
                mods: Mods::Hidden | Mods::DoubleTime,
                ..score(3, "bbbb", 300, 50.0)
            }),
        ];
        ctx.profiles
            .insert(profile_with("me", PlayBucket::Ranked, plays))
            .await;
        ctx.beatmaps
            .put(
                "aaaa",
                Beatmap::Canonical(canonical(1, "aaaa", RankedStatus::Ranked)),
            )
            .await
            .unwrap();
        ctx
    }

    #[tokio::test]
    async fn stats_weight_the_best_play_per_beatmap() {
        let ctx = context_with_plays().await;
        let stats = fetch_stats(&ctx, "me").await.unwrap();
        assert_eq!(stats.playcount, 3);
        assert!((stats.pp - (200.0 + 50.0 * 0.95)).abs() < 1e-3, "{}", stats.pp);
    }

    #[tokio::test]
    async fn tops_are_sorted_limited_and_decorated() {
        let ctx = context_with_plays().await;

        let tops = fetch_tops(&ctx, "me", 100).await.unwrap();
        let ids: Vec<i64> = tops.iter().map(|play| play.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(tops[0].bmap.as_ref().map(|bmap| bmap.id), Some(1));
        assert!(tops[1].bmap.is_none());
        assert_eq!(tops[1].mods_str, "HDDT");

        let limited = fetch_tops(&ctx, "me", 1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn recent_is_newest_first() {
        let ctx = context_with_plays().await;
        let recent = fetch_recent(&ctx, "me", 2).await.unwrap();
        let ids: Vec<i64> = recent.iter().map(|play| play.id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(recent[1].mods_str, "NM");
    }

    #[tokio::test]
    async fn unknown_profiles_are_reported() {
        let ctx = TestContext::new(vec![]).await;
        assert_eq!(
            fetch_stats(&ctx, "nobody").await.unwrap_err(),
            AppError::ProfilesNotFound
        );
        assert_eq!(
            fetch_recent(&ctx, "nobody", 10).await.unwrap_err(),
            AppError::ProfilesNotFound
        );
        assert_eq!(wipe(&ctx, "nobody").await.unwrap_err(), AppError::ProfilesNotFound);
    }

    #[tokio::test]
    async fn wipe_clears_and_persists() {
        let ctx = context_with_plays().await;
        wipe(&ctx, "me").await.unwrap();

        let stats = fetch_stats(&ctx, "me").await.unwrap();
        assert_eq!(stats.playcount, 0);
        assert_eq!(stats.pp, 0.0);

        let reloaded = ProfileStore::load(ctx.dir.join("profiles.json")).await.unwrap();
        assert!(reloaded.fetch_one("me").await.unwrap().plays.all_plays.is_empty());
    }
}
