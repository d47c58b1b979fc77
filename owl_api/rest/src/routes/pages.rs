use std::{io, path::PathBuf};

use axum::{
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE, EXPIRES, PRAGMA},
        StatusCode,
    },
    response::{IntoResponse, Response},
    routing, Router,
};
use tower_http::services::ServeDir;
use tracing::warn;

use super::{error, internal_server_error};
use crate::RestServerConfig;

/// Routes and the HTML file each of them serves.
pub const PAGES: [(&str, &str); 4] = [
    ("/", "owl-latam.html"),
    ("/fva", "fva.html"),
    ("/calendario", "calendario.html"),
    ("/casos", "casos.html"),
];

pub fn router(config: &RestServerConfig) -> Router<()> {
    PAGES
        .into_iter()
        .fold(Router::new(), |router, (route, file)| {
            let path = config.pages_dir.join(file);
            router.route(route, routing::get(move || page(path)))
        })
        .nest_service("/static", ServeDir::new(&*config.static_dir))
}

async fn page(path: PathBuf) -> Response {
    match tokio::fs::read(&path).await {
        Ok(content) => (
            [
                (CONTENT_TYPE, "text/html; charset=utf-8"),
                (CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
                (PRAGMA, "no-cache"),
                (EXPIRES, "0"),
            ],
            content,
        )
            .into_response(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "page not found");
            error(StatusCode::NOT_FOUND, "Not Found")
        }
        Err(err) => internal_server_error(
            anyhow::Error::new(err).context(format!("Failed to read {}", path.display())),
        ),
    }
}
