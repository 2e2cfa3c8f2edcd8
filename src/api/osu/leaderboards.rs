use crate::api::RequestContext;
use crate::models::leaderboards::{Leaderboard, LeaderboardRequest, LeaderboardRequestArgs};
use crate::usecases::leaderboards;
use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use axum::http::header;
use axum::response::IntoResponse;
use tracing::warn;

/// Controller for `/web/osu-osz2-getscores.php`.
/// Always answers in the legacy text format, even for malformed queries.
pub async fn get_scores(
    ctx: RequestContext,
    args: Result<Query<LeaderboardRequestArgs>, QueryRejection>,
) -> impl IntoResponse {
    let leaderboard = match args {
        Ok(Query(args)) => {
            let request = LeaderboardRequest::from(args);
            leaderboards::fetch_leaderboard(&ctx, &request).await
        }
        Err(e) => {
            warn!("Failed to decode leaderboard request: {e}");
            Leaderboard::NotSubmitted
        }
    };
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        leaderboard.serialize(),
    )
}
