use axum::Router;
use tower_http::cors::CorsLayer;

/// Allow any origin, method and header, with credentials.
///
/// The request origin is mirrored back since a wildcard origin cannot be
/// combined with credentials.
pub fn add<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    router.layer(CorsLayer::very_permissive())
}
