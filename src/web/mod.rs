//! HTTP surface: one page plus a small JSON API over the shared dataset.
//!
//! Every request renders synchronously against an immutable
//! `Arc<FleetDataset>`; handlers hold no locks.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::data::filter::FilterSelection;
use crate::data::model::{FleetDataset, YearRange};

const INDEX_HTML: &str = include_str!("../../assets/index.html");

#[derive(Clone)]
pub struct WebState {
    dataset: Arc<FleetDataset>,
    config: Arc<DashboardConfig>,
}

impl WebState {
    pub fn new(dataset: Arc<FleetDataset>, config: DashboardConfig) -> Self {
        Self {
            dataset,
            config: Arc::new(config),
        }
    }
}

/// Everything the page needs to build its filter controls.
#[derive(Debug, Serialize)]
pub struct FilterOptions {
    pub vehicle_types: Vec<String>,
    pub fuel_sources: Vec<String>,
    pub year_bounds: Option<YearRange>,
    pub default_selection: FilterSelection,
}

pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/options", get(options))
        .route("/api/dashboard", post(dashboard))
        .route("/healthz", get(health))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(state: WebState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Dashboard listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> &'static str {
    "ok"
}

async fn options(State(state): State<WebState>) -> Json<FilterOptions> {
    let ds = &state.dataset;
    Json(FilterOptions {
        vehicle_types: ds.vehicle_types().to_vec(),
        fuel_sources: ds.fuel_sources().to_vec(),
        year_bounds: ds.year_bounds(),
        default_selection: FilterSelection::initial(
            ds,
            &state.config.default_types,
            &state.config.default_fuels,
        ),
    })
}

async fn dashboard(
    State(state): State<WebState>,
    Json(selection): Json<FilterSelection>,
) -> Json<Dashboard> {
    Json(Dashboard::build(&state.dataset, &selection, &state.config.limits))
}
