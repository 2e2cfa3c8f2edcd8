pub mod leaderboards;

pub async fn index() -> &'static str {
    "Running leaderboard-service v0.1"
}
