//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the redirect handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Dispatch every request through the live redirect chain
//! - Recompile and swap the chain on config updates

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::Response,
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc, Mutex};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ShortenerConfig;
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::http::response::{self, Fallback};
use crate::lifecycle::{compile_chain, StartupError};
use crate::observability::metrics;
use crate::redirect::{Dispatch, FallbackChain, LiveChain};
use crate::source::RedirectStore;

/// The live chain, published together with the config it was compiled from.
pub type LiveRoutes = LiveChain<Fallback, Arc<ShortenerConfig>>;

/// Application state injected into handlers.
///
/// Every rebuild (store edit, admin reload, config update) runs under
/// `rebuild_lock`, so generations are published in the order their
/// inputs were changed.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<LiveRoutes>,
    pub store: Arc<RedirectStore>,
    rebuild_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Compile the initial chain. A compile error here is a startup error.
    pub fn new(config: ShortenerConfig, store: Arc<RedirectStore>) -> Result<Self, StartupError> {
        let chain = compile(&config, &store)?;
        Ok(Self {
            chain: Arc::new(LiveChain::new(chain, Arc::new(config))),
            store,
            rebuild_lock: Arc::new(Mutex::new(())),
        })
    }

    /// The config of the published generation.
    pub fn config(&self) -> Arc<ShortenerConfig> {
        Arc::clone(self.chain.load().context())
    }

    /// Recompile from the current config and store, then publish.
    ///
    /// On error the published chain is left as it was.
    pub async fn rebuild(&self) -> Result<(), StartupError> {
        let _guard = self.rebuild_lock.lock().await;
        self.republish(self.config()).await
    }

    /// Compile `config`; on success publish it with its chain.
    pub async fn apply_config(&self, config: ShortenerConfig) -> Result<(), StartupError> {
        let _guard = self.rebuild_lock.lock().await;
        self.republish(Arc::new(config)).await
    }

    /// Set a store entry and publish a chain that includes it.
    ///
    /// Returns the destination it replaced. If the chain does not compile
    /// the store edit is undone.
    pub async fn put_store(&self, path: &str, destination: &str) -> Result<Option<String>, StartupError> {
        let _guard = self.rebuild_lock.lock().await;
        let previous = self.store.put(path, destination);
        if let Err(e) = self.republish(self.config()).await {
            match &previous {
                Some(old) => self.store.put(path, old.as_str()),
                None => self.store.remove(path),
            };
            return Err(e);
        }
        Ok(previous)
    }

    /// Remove a store entry and publish a chain without it.
    ///
    /// `Ok(None)` means there was no such entry and nothing was rebuilt.
    pub async fn remove_store(&self, path: &str) -> Result<Option<String>, StartupError> {
        let _guard = self.rebuild_lock.lock().await;
        let Some(previous) = self.store.remove(path) else {
            return Ok(None);
        };
        if let Err(e) = self.republish(self.config()).await {
            self.store.put(path, previous.as_str());
            return Err(e);
        }
        Ok(Some(previous))
    }

    /// Compile off the async workers (file reads block) and publish.
    /// Callers hold `rebuild_lock`.
    async fn republish(&self, config: Arc<ShortenerConfig>) -> Result<(), StartupError> {
        let store = Arc::clone(&self.store);
        let compile_config = Arc::clone(&config);
        let compiled = tokio::task::spawn_blocking(move || compile(&compile_config, &store))
            .await
            .map_err(StartupError::from)
            .and_then(|compiled| compiled);

        match compiled {
            Ok(chain) => {
                self.chain.publish(chain, config);
                metrics::record_reload(true);
                Ok(())
            }
            Err(e) => {
                metrics::record_reload(false);
                Err(e)
            }
        }
    }
}

fn compile(config: &ShortenerConfig, store: &RedirectStore) -> Result<FallbackChain<Fallback>, StartupError> {
    compile_chain(&config.layers, store, Fallback::from_config(&config.fallback))
}

/// Status used for every redirect under `config`.
pub fn redirect_status(config: &ShortenerConfig) -> StatusCode {
    StatusCode::from_u16(config.redirect.status).unwrap_or(StatusCode::PERMANENT_REDIRECT)
}

/// HTTP server for the shortener.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The key-value store is seeded from `[store]`.
    pub fn new(config: ShortenerConfig) -> Result<Self, StartupError> {
        let store = Arc::new(RedirectStore::with_seed(config.store.seed.clone()));
        Ok(Self::with_state(AppState::new(config, store)?))
    }

    pub fn with_state(state: AppState) -> Self {
        let request_secs = state.config().timeouts.request_secs;
        let router = Self::build_router(request_secs, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(request_secs: u64, state: AppState) -> Router {
        Router::new()
            .route("/", any(redirect_handler))
            .route("/{*path}", any(redirect_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(request_secs))),
            )
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The router, for serving or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Each config received on `config_updates` is compiled and, if it
    /// compiles, swapped in; otherwise the current chain keeps serving.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ShortenerConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let state = self.state.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match state.apply_config(config).await {
                    Ok(()) => {
                        let chain = state.chain.load();
                        tracing::info!(layers = chain.len(), entries = chain.total_entries(), "Redirect chain reloaded");
                    }
                    Err(e) => tracing::error!(error = %e, "Reload failed. Keeping current chain."),
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main handler: resolve the path through the chain, redirect or fall back.
async fn redirect_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    // Chain and status come from the same generation.
    let routes = state.chain.load();
    let dispatch = routes.route(request.uri().path());

    match dispatch {
        Dispatch::Redirect(signal) => {
            tracing::debug!(
                request_id = %request_id(&request),
                path = %request.uri().path(),
                layer = %signal.layer,
                destination = %signal.destination,
                "Redirecting"
            );
            metrics::record_request(metrics::OUTCOME_REDIRECT, Some(signal.layer), start_time);
            response::redirect(redirect_status(routes.context()), signal.destination)
        }
        Dispatch::Fallback(terminal) => {
            tracing::debug!(
                request_id = %request_id(&request),
                path = %request.uri().path(),
                "No redirect, falling back"
            );
            metrics::record_request(metrics::OUTCOME_FALLBACK, None, start_time);
            terminal.respond(request)
        }
    }
}
