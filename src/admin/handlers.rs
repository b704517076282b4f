use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use crate::http::server::{redirect_status, AppState};
use crate::redirect::LayerInfo;
use crate::source::RedirectRecord;

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
    pub layers: usize,
    pub entries: usize,
    pub store_entries: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChainView {
    /// Layers in the order they are checked.
    pub layers: Vec<LayerInfo>,
    pub fallback_status: u16,
    pub redirect_status: u16,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Resolution {
    pub path: String,
    pub layer: Option<String>,
    pub destination: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreChange {
    pub path: String,
    pub previous: Option<String>,
    pub store_entries: usize,
}

type AdminError = (StatusCode, String);

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let chain = state.chain.load();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        layers: chain.len(),
        entries: chain.total_entries(),
        store_entries: state.store.len(),
    })
}

pub async fn get_layers(State(state): State<AppState>) -> Json<ChainView> {
    let routes = state.chain.load();
    Json(ChainView {
        layers: routes.layers(),
        fallback_status: routes.terminal().status().as_u16(),
        redirect_status: redirect_status(routes.context()).as_u16(),
    })
}

pub async fn get_resolve(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Json<Resolution> {
    let chain = state.chain.load();
    let hit = chain.resolve(&query.path);
    Json(Resolution {
        layer: hit.map(|s| s.layer.to_string()),
        destination: hit.map(|s| s.destination.to_string()),
        path: query.path,
    })
}

pub async fn get_store(State(state): State<AppState>) -> Json<Vec<RedirectRecord>> {
    Json(state.store.records())
}

/// Insert or overwrite a store entry and republish the chain.
pub async fn put_store(
    State(state): State<AppState>,
    Json(record): Json<RedirectRecord>,
) -> Result<Json<StoreChange>, AdminError> {
    if record.path.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "path must not be empty".to_string()));
    }

    let previous = state
        .put_store(&record.path, &record.destination)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, path = %record.path, "Store update rejected, chain rebuild failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    tracing::info!(path = %record.path, destination = %record.destination, "Store entry set");
    Ok(Json(StoreChange {
        path: record.path,
        previous,
        store_entries: state.store.len(),
    }))
}

/// Remove a store entry and republish the chain.
pub async fn delete_store(
    State(state): State<AppState>,
    Json(request): Json<RemoveRequest>,
) -> Result<Json<StoreChange>, AdminError> {
    let removed = state.remove_store(&request.path).await.map_err(|e| {
        tracing::error!(error = %e, path = %request.path, "Store removal rejected, chain rebuild failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    let Some(previous) = removed else {
        return Err((StatusCode::NOT_FOUND, format!("no store entry for '{}'", request.path)));
    };

    tracing::info!(path = %request.path, "Store entry removed");
    Ok(Json(StoreChange {
        path: request.path,
        previous: Some(previous),
        store_entries: state.store.len(),
    }))
}

/// Recompile every layer (re-reading mapping files) and publish.
pub async fn post_reload(State(state): State<AppState>) -> Result<Json<ChainView>, AdminError> {
    state.rebuild().await.map_err(|e| {
        tracing::error!(error = %e, "Manual reload failed. Keeping current chain.");
        (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    })?;

    tracing::info!("Redirect chain reloaded on request");
    Ok(get_layers(State(state)).await)
}
