use axum::{http::StatusCode, Json, Router, routing::get};
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use serde_derive::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adapter::CountryLayerEffect;
use client::{CountriesClient, CountrySource};
use config::{AppConfig, MapSettings};
use map::{MapHandle, MapInstance, MarkerLayer};

mod adapter;
mod client;
mod config;
mod constants;
mod covid;
mod geo;
mod map;
mod marker;
mod page;

#[derive(Clone)]
pub struct AppState {
    settings: MapSettings,
    client: CountriesClient
}

#[derive(Serialize, Deserialize)]
struct ErrorResponse {
    error: String
}

fn error_response(status: StatusCode, error: impl ToString) -> Response {
    (status, Json(ErrorResponse { error: error.to_string() })).into_response()
}

async fn index(State(state): State<AppState>) -> Response {
    match page::render(&state.settings) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Unable to render page: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn settings_endpoint(State(state): State<AppState>) -> Json<MapSettings> {
    Json(state.settings)
}

#[derive(Serialize, Deserialize)]
struct LayersResponse {
    settings: MapSettings,
    layers: Vec<MarkerLayer>
}

/// Initialises a map, lets the country effect run against it and reports
/// what ended up attached. A failed upstream fetch yields no layers.
async fn layers_endpoint(State(state): State<AppState>) -> Json<LayersResponse> {
    let effect = CountryLayerEffect::new(&state.client);
    let map = MapInstance::initialize(state.settings.clone(), &effect).await;

    Json(LayersResponse {
        settings: map.settings().clone(),
        layers: map.layers().to_vec()
    })
}

async fn geojson_endpoint(State(state): State<AppState>) -> Response {
    match state.client.fetch_countries().await {
        Ok(countries) => Json(geo::countries_to_feature_collection(&countries)).into_response(),
        Err(e) => {
            tracing::error!(url = state.client.url(), "Failed to fetch countries: {}", e);
            error_response(StatusCode::BAD_GATEWAY, e)
        }
    }
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/map", get(settings_endpoint))
        .route("/api/layers", get(layers_endpoint))
        .route("/api/countries.geojson", get(geojson_endpoint))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "covid_map=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let app_state = AppState {
        settings: config.map.clone(),
        client: CountriesClient::new(config.countries_url.clone())
    };

    tracing::info!("Countries endpoint: {}", config.countries_url);
    tracing::info!("Base map: {}, zoom {}", config.map.default_base_map, config.map.zoom);
    tracing::info!("Listening on {}", config.addr);

    axum::Server::bind(&config.addr)
        .serve(app(app_state).into_make_service())
        .await?;

    Ok(())
}
