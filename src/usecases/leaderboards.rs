use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult};
use crate::models::beatmaps::Beatmap;
use crate::models::leaderboards::{
    Leaderboard, LeaderboardRequest, LeaderboardType, PersonalScore,
};
use crate::models::scores::Score;
use crate::repositories::profiles::PlayBucket;
use crate::usecases::{beatmaps, modified_beatmaps};
use tracing::{debug, info};

/// Resolves the requested beatmap and builds its leaderboard. Failures never
/// reach the client; they degrade to a sentinel leaderboard.
pub async fn fetch_leaderboard<C: Context>(ctx: &C, request: &LeaderboardRequest) -> Leaderboard {
    let beatmap = match resolve_beatmap(ctx, request).await {
        Ok(beatmap) => Some(beatmap),
        Err(e) => {
            debug!(
                beatmap_md5 = %request.beatmap_md5,
                filename = %request.filename,
                "Beatmap not resolved: {}",
                e.message()
            );
            None
        }
    };

    let scores = match &beatmap {
        Some(beatmap) => match fetch_scores(ctx, request, beatmap).await {
            Ok(scores) => scores,
            Err(e) => {
                debug!(beatmap_md5 = %request.beatmap_md5, "No scores served: {}", e.message());
                vec![]
            }
        },
        None => vec![],
    };
    let leaderboard = assemble(beatmap, scores, request);
    if let Leaderboard::Ranked { scores, .. } = &leaderboard {
        info!(
            beatmap_md5 = %request.beatmap_md5,
            scores = scores.len(),
            "Served leaderboard"
        );
    }
    leaderboard
}

async fn resolve_beatmap<C: Context>(
    ctx: &C,
    request: &LeaderboardRequest,
) -> ServiceResult<Beatmap> {
    match modified_beatmaps::resolve(ctx, &request.filename, &request.beatmap_md5).await {
        // Not a tracked modified file; try it as an unmodified beatmap.
        Err(AppError::BeatmapsUnresolved) => {
            beatmaps::fetch_by_md5(ctx, &request.beatmap_md5).await
        }
        result => result,
    }
}

async fn fetch_scores<C: Context>(
    ctx: &C,
    request: &LeaderboardRequest,
    beatmap: &Beatmap,
) -> ServiceResult<Vec<Score>> {
    let Some(bucket) = PlayBucket::for_status(beatmap.ranked_status()) else {
        return Err(AppError::BeatmapsIneligibleStatus);
    };
    // The client always sends its account name; the configured profile wins.
    let Some(profile) = ctx.current_profile().or(request.username.as_deref()) else {
        return Err(AppError::ProfilesMissingName);
    };
    let scores = ctx
        .profiles()
        .fetch_plays(profile, bucket, &request.beatmap_md5)
        .await
        .into_iter()
        .map(Score::from)
        .collect();
    Ok(scores)
}

/// Builds the leaderboard view from a resolved beatmap and the requester's
/// plays on it.
pub fn assemble(
    beatmap: Option<Beatmap>,
    mut scores: Vec<Score>,
    request: &LeaderboardRequest,
) -> Leaderboard {
    let Some(beatmap) = beatmap else {
        return Leaderboard::NotSubmitted;
    };
    let status = beatmap.ranked_status();
    if !status.has_leaderboard() {
        return Leaderboard::Unranked(status);
    }

    if request.leaderboard_type == LeaderboardType::Mods {
        scores.retain(|score| score.mods == request.mods);
        if scores.is_empty() {
            return Leaderboard::NotSubmitted;
        }
    }

    // sort_by is stable; ties keep their stored order
    scores.sort_by(|a, b| b.score.cmp(&a.score));

    // Every play belongs to the requester, so their best is the top row.
    let personal = scores.first().map(|best| PersonalScore {
        score: Score {
            score: best.performance.trunc() as i64,
            ..best.clone()
        },
        rank: 1,
    });

    Leaderboard::Ranked {
        beatmap,
        scores,
        personal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::TestContext;
    use crate::entities::scores::ScoreEntity;
    use crate::models::beatmaps::RankedStatus;
    use crate::models::beatmaps::tests::canonical;
    use crate::models::mods::Mods;
    use crate::models::scores::tests::score;
    use crate::repositories::profiles::tests::profile_with;

    fn request(leaderboard_type: LeaderboardType, mods: Mods) -> LeaderboardRequest {
        LeaderboardRequest {
            filename: "Artist - Title (Mapper) [Hard].osu".to_owned(),
            beatmap_md5: "aaaa".to_owned(),
            mods,
            leaderboard_type,
            username: Some("me".to_owned()),
        }
    }

    fn ranked_beatmap() -> Beatmap {
        Beatmap::Canonical(canonical(1234, "aaaa", RankedStatus::Ranked))
    }

    #[test]
    fn scores_are_sorted_and_personal_shows_pp() {
        let scores = vec![
            score(1, "aaaa", 500, 50.0),
            score(2, "aaaa", 900, 123.9),
            score(3, "aaaa", 300, 20.0),
        ];
        let leaderboard = assemble(
            Some(ranked_beatmap()),
            scores,
            &request(LeaderboardType::Top, Mods::empty()),
        );

        let Leaderboard::Ranked {
            scores, personal, ..
        } = leaderboard
        else {
            panic!("expected a ranked leaderboard");
        };
        let values: Vec<i64> = scores.iter().map(|score| score.score).collect();
        assert_eq!(values, vec![900, 500, 300]);

        let personal = personal.unwrap();
        assert_eq!(personal.rank, 1);
        assert_eq!(personal.score.score_id, 2);
        assert_eq!(personal.score.score, 123);
    }

    #[test]
    fn ties_keep_their_order() {
        let scores = vec![score(1, "aaaa", 500, 1.0), score(2, "aaaa", 500, 2.0)];
        let leaderboard = assemble(
            Some(ranked_beatmap()),
            scores,
            &request(LeaderboardType::Top, Mods::empty()),
        );
        let Leaderboard::Ranked { scores, .. } = leaderboard else {
            panic!("expected a ranked leaderboard");
        };
        assert_eq!(scores[0].score_id, 1);
        assert_eq!(scores[1].score_id, 2);
    }

    #[test]
    fn unresolved_and_pending_beatmaps_are_sentinels() {
        let request = request(LeaderboardType::Top, Mods::empty());
        let unresolved = assemble(None, vec![], &request);
        assert_eq!(unresolved.serialize(), b"0|false");

        let pending = Beatmap::Canonical(canonical(1, "aaaa", RankedStatus::Pending));
        let pending = assemble(Some(pending), vec![score(1, "aaaa", 5, 1.0)], &request);
        assert_eq!(pending, Leaderboard::Unranked(RankedStatus::Pending));
        assert_eq!(pending.serialize(), b"0|false");
    }

    #[test]
    fn mods_leaderboard_keeps_exact_matches() {
        let dt = Score {
            mods: Mods::DoubleTime,
            ..score(1, "aaaa", 900, 10.0)
        };
        let hddt = Score {
            mods: Mods::Hidden | Mods::DoubleTime,
            ..score(2, "aaaa", 1000, 20.0)
        };
        let nomod = score(3, "aaaa", 800, 5.0);
        let scores = vec![dt, hddt, nomod];

        let leaderboard = assemble(
            Some(ranked_beatmap()),
            scores.clone(),
            &request(LeaderboardType::Mods, Mods::DoubleTime),
        );
        let Leaderboard::Ranked { scores: kept, .. } = leaderboard else {
            panic!("expected a ranked leaderboard");
        };
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].score_id, 1);

        let empty = assemble(
            Some(ranked_beatmap()),
            scores,
            &request(LeaderboardType::Mods, Mods::HardRock),
        );
        assert_eq!(empty, Leaderboard::NotSubmitted);
        assert_eq!(empty.serialize(), b"0|false");
    }

    #[tokio::test]
    async fn requester_plays_are_served() {
        let ctx = TestContext::new(vec![canonical(1234, "aaaa", RankedStatus::Ranked)]).await;
        let plays = vec![
            ScoreEntity::from(score(1, "aaaa", 500, 50.0)),
            ScoreEntity::from(score(2, "aaaa", 900, 90.0)),
        ];
        ctx.profiles
            .insert(profile_with("me", PlayBucket::Ranked, plays))
            .await;

        let leaderboard =
            fetch_leaderboard(&ctx, &request(LeaderboardType::Top, Mods::empty())).await;
        let Leaderboard::Ranked { beatmap, scores, .. } = leaderboard else {
            panic!("expected a ranked leaderboard");
        };
        assert_eq!(beatmap.beatmap_id(), 1234);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].score, 900);
    }

    #[tokio::test]
    async fn unknown_beatmaps_are_not_submitted() {
        let ctx = TestContext::new(vec![]).await;
        let leaderboard =
            fetch_leaderboard(&ctx, &request(LeaderboardType::Top, Mods::empty())).await;
        assert_eq!(leaderboard, Leaderboard::NotSubmitted);
    }

    #[tokio::test]
    async fn configured_profile_is_preferred_over_client_name() {
        let ctx = TestContext::new(vec![canonical(1234, "aaaa", RankedStatus::Ranked)]).await;
        let plays = vec![ScoreEntity::from(score(1, "aaaa", 500, 50.0))];
        ctx.profiles
            .insert(profile_with("me", PlayBucket::Ranked, plays))
            .await;
        let request = LeaderboardRequest {
            username: Some("peppy".to_owned()),
            ..request(LeaderboardType::Top, Mods::empty())
        };

        let leaderboard = fetch_leaderboard(&ctx, &request).await;
        let Leaderboard::Ranked { scores, .. } = leaderboard else {
            panic!("expected a ranked leaderboard");
        };
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].score_id, 1);
    }

    #[tokio::test]
    async fn client_name_is_used_without_a_configured_profile() {
        let mut ctx =
            TestContext::new(vec![canonical(1234, "aaaa", RankedStatus::Ranked)]).await;
        ctx.current_profile = None;
        let plays = vec![ScoreEntity::from(score(1, "aaaa", 500, 50.0))];
        ctx.profiles
            .insert(profile_with("peppy", PlayBucket::Ranked, plays))
            .await;
        let request = LeaderboardRequest {
            username: Some("peppy".to_owned()),
            ..request(LeaderboardType::Top, Mods::empty())
        };

        let leaderboard = fetch_leaderboard(&ctx, &request).await;
        let Leaderboard::Ranked { scores, .. } = leaderboard else {
            panic!("expected a ranked leaderboard");
        };
        assert_eq!(scores.len(), 1);
    }
}
