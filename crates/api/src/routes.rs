use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{StatusCode, Uri},
    routing::get,
    Router,
};
use geodoh_domain::Region;

/// Builds the full router: one DoH route per region, health and cache
/// statistics, a 404 fallback for everything else.
pub fn create_router(state: AppState) -> Router {
    let doh = get(handlers::handle_get)
        .post(handlers::handle_post)
        .fallback(handlers::method_not_supported);

    let mut router = Router::new();
    for region in Region::ALL {
        router = router.route(region.route_path(), doh.clone());
    }

    router
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        .fallback(unknown_route)
        .with_state(state)
}

async fn unknown_route(uri: Uri) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        format!("Unknown route: {}", uri.path()),
    )
}
