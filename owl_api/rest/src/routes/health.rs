use axum::{routing, Json, Router};

use crate::models::ApiOk;

pub fn router() -> Router<()> {
    Router::new().route("/health", routing::get(health))
}

async fn health() -> Json<ApiOk> {
    Json(ApiOk::new())
}
