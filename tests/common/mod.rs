//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use urlshort::admin::setup_admin_router;
use urlshort::config::{LayerConfig, SourceConfig};
use urlshort::http::{AppState, HttpServer};
use urlshort::lifecycle::Shutdown;
use urlshort::source::RedirectRecord;
use urlshort::ShortenerConfig;

#[allow(dead_code)]
pub const ADMIN_KEY: &str = "test-admin-key";

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    pub config_updates: mpsc::UnboundedSender<ShortenerConfig>,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the redirect server for `config`.
pub async fn start_server(config: ShortenerConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).expect("chain should compile");
    let state = server.state().clone();
    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    TestServer { addr, state, config_updates, shutdown }
}

/// Serve the admin API for `state` on an ephemeral port.
#[allow(dead_code)]
pub async fn start_admin(state: AppState) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = setup_admin_router(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// HTTP client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

pub fn inline_layer(name: &str, pairs: &[(&str, &str)]) -> LayerConfig {
    LayerConfig {
        name: name.to_string(),
        sources: vec![SourceConfig::Inline {
            entries: pairs.iter().map(|(p, u)| RedirectRecord::new(*p, *u)).collect(),
        }],
    }
}

/// Write `contents` to a uniquely named file in the temp dir.
#[allow(dead_code)]
pub fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("urlshort-it-{}-{name}", uuid::Uuid::new_v4()));
    std::fs::write(&path, contents).unwrap();
    path
}

/// Poll `check` until it holds or two seconds pass.
#[allow(dead_code)]
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..40 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}
