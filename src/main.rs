use leaderboard_service::api;
use leaderboard_service::common::init;
use leaderboard_service::settings::AppSettings;
use leaderboard_service::workers::crons;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = AppSettings::get();
    init::initialize_logging(settings);
    match settings.app_component.as_str() {
        "api" => api::serve(settings).await,
        "recalc-cron" => crons::recalc_cron::serve(settings).await,
        component => anyhow::bail!("Unknown app component: {component}"),
    }
}
