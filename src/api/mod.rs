use crate::adapters::beatmaps_catalog::BeatmapCatalog;
use crate::adapters::performance_calculator::PerformanceCalculator;
use crate::common::context::Context;
use crate::common::data_lock::DataLock;
use crate::common::init;
use crate::common::paths::PathTranslator;
use crate::common::state::AppState;
use crate::repositories::beatmaps::BeatmapRegistry;
use crate::repositories::profiles::ProfileStore;
use crate::settings::AppSettings;
use axum::Router;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::routing::get;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub mod osu;
pub mod v1;

pub struct RequestContext {
    state: AppState,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(osu::index))
        .route(
            "/web/osu-osz2-getscores.php",
            get(osu::leaderboards::get_scores),
        )
        .nest("/api/v1", v1::router())
}

pub async fn serve(settings: &AppSettings) -> anyhow::Result<()> {
    let _lock = DataLock::acquire(&settings.data_dir, "api")?;
    let state = init::initialize_state(settings).await?;
    let app = router().with_state(state);

    let addr = SocketAddr::new(settings.app_host, settings.app_port);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Serving leaderboards");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self {
            state: state.clone(),
        })
    }
}

impl Context for RequestContext {
    fn beatmaps(&self) -> &BeatmapRegistry {
        self.state.beatmaps()
    }

    fn profiles(&self) -> &ProfileStore {
        self.state.profiles()
    }

    fn catalog(&self) -> &dyn BeatmapCatalog {
        self.state.catalog()
    }

    fn calculator(&self) -> Arc<dyn PerformanceCalculator> {
        self.state.calculator()
    }

    fn paths(&self) -> &dyn PathTranslator {
        self.state.paths()
    }

    fn modified_index_path(&self) -> &Path {
        self.state.modified_index_path()
    }

    fn current_profile(&self) -> Option<&str> {
        self.state.current_profile()
    }
}
