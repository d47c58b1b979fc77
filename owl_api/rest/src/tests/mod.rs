use std::{
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

use owl_core_lead_contracts::MockLeadFeatureService;
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::{RestServer, RestServerConfig};

mod cors;
mod health;

/// A server bound to an ephemeral port on localhost.
struct TestApp {
    base_url: String,
    client: reqwest::Client,
}

impl TestApp {
    async fn spawn(lead: MockLeadFeatureService) -> Self {
        let dir = temp_dir();
        Self::spawn_with_dirs(lead, &dir, &dir).await
    }

    async fn spawn_with_dirs(
        lead: MockLeadFeatureService,
        pages_dir: &Path,
        static_dir: &Path,
    ) -> Self {
        let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();

        let server = RestServer {
            lead,
            config: RestServerConfig {
                addr,
                pages_dir: pages_dir.into(),
                static_dir: static_dir.into(),
            },
        };
        tokio::spawn(server.serve_on(listener));

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// A fresh directory below the system temp dir.
fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("owl-rest-{}", Uuid::now_v7()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
