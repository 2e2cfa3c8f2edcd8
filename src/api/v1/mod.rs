pub mod profiles;

use crate::common::state::AppState;
use axum::Router;
use axum::routing::get;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profiles::profile))
        .route("/tops", get(profiles::tops))
        .route("/recent", get(profiles::recent))
        .route("/wipe", get(profiles::wipe))
        .route("/recalc", get(profiles::recalc))
        .nest("/client", client_router())
}

/// Same endpoints, always for the profile configured on this machine.
fn client_router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profiles::client_profile))
        .route("/tops", get(profiles::client_tops))
        .route("/recent", get(profiles::client_recent))
        .route("/wipe", get(profiles::client_wipe))
        .route("/recalc", get(profiles::recalc))
}
