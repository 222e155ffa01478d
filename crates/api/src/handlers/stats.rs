use crate::dto::CacheStatsResponse;
use crate::state::AppState;
use axum::{extract::State, Json};
use tracing::{debug, instrument};

#[instrument(skip(state), name = "api_get_stats")]
pub async fn get_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let snapshot = state.cache_stats.snapshot();

    debug!(
        entries = snapshot.entries,
        hits = snapshot.hits,
        misses = snapshot.misses,
        "Cache statistics retrieved"
    );

    Json(CacheStatsResponse {
        entries: snapshot.entries,
        hits: snapshot.hits,
        misses: snapshot.misses,
        insertions: snapshot.insertions,
    })
}
