pub mod ingest;

use axum::Router;
use axum::routing::post;

use crate::state::SharedState;

pub fn ingest_routes() -> Router<SharedState> {
    Router::new().route("/v1/intake", post(ingest::ingest))
}
