//! # jobtrends-server
//!
//! REST API backing the job-posting dashboards: company leaderboard,
//! locations map and the monthly forecast. Datasets load once at startup;
//! each request recomputes its view from the loaded tables.

use std::env;
use std::fs::File;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dataset::{
    load_companies, load_locations, load_series, CompanyRecord, LocationRecord, MonthlyPoint,
    Result as DataResult,
};
use geocode::{Nominatim, PlaceResolver};
use sarima::{Sarima, SarimaOrder, SeasonalOrder};

mod routes;

/// Preamble rows above the header in each source export.
const COMPANIES_SKIP_ROWS: usize = 2;
const LOCATIONS_SKIP_ROWS: usize = 0;
const SERIES_SKIP_ROWS: usize = 2;

/// The three tables every dashboard reads from.
pub struct Datasets {
    pub companies: Vec<CompanyRecord>,
    pub locations: Vec<LocationRecord>,
    pub series: Vec<MonthlyPoint>,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub datasets: Arc<Datasets>,
    pub resolver: Arc<dyn PlaceResolver>,
    /// Pause between geocoding requests within one batch.
    pub geocode_delay: Duration,
}

/// Load the three CSV exports from the data directory.
pub fn load_datasets(dir: &Path) -> DataResult<Datasets> {
    let companies = load_companies(File::open(dir.join("companies.csv"))?, COMPANIES_SKIP_ROWS)?;
    let locations = load_locations(File::open(dir.join("locations.csv"))?, LOCATIONS_SKIP_ROWS)?;
    let series = load_series(File::open(dir.join("series.csv"))?, SERIES_SKIP_ROWS)?;
    Ok(Datasets {
        companies,
        locations,
        series,
    })
}

/// Liveness probe - is the server running?
async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe - datasets loaded and the estimation path functional.
async fn readiness(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    // A trivial fit exercises differencing, estimation and AIC end to end.
    let probe: Vec<f64> = (0..24)
        .map(|i| 100.0 + i as f64 + ((i * 7) % 5) as f64)
        .collect();
    let engine_ok = Sarima::new(
        SarimaOrder { p: 1, d: 1, q: 0 },
        SeasonalOrder {
            p: 0,
            d: 0,
            q: 0,
            period: 12,
        },
    )
    .and_then(|mut model| model.fit(&probe))
    .is_ok();

    Json(serde_json::json!({
        "status": if engine_ok { "ready" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "datasets": {
            "companies": state.datasets.companies.len(),
            "locations": state.datasets.locations.len(),
            "series_months": state.datasets.series.len(),
        }
    }))
}

/// Build the router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints (Kubernetes-compatible)
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        // API endpoints
        .route("/api/v1/companies", get(routes::companies))
        .route("/api/v1/locations", get(routes::locations))
        .route("/api/v1/locations/states", get(routes::states))
        .route("/api/v1/series", get(routes::series))
        .route("/api/v1/forecast", post(routes::forecast))
        .route("/api/v1/forecast/export", get(routes::forecast_export))
        // Middleware layers
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,tower_http=info".into()),
        )
        .init();

    let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let datasets = load_datasets(Path::new(&data_dir))
        .unwrap_or_else(|e| panic!("failed to load datasets from {data_dir}: {e}"));
    tracing::info!(
        companies = datasets.companies.len(),
        locations = datasets.locations.len(),
        series_months = datasets.series.len(),
        "datasets loaded"
    );

    let geocode_delay_ms: u64 = env::var("GEOCODE_DELAY_MS")
        .unwrap_or_else(|_| "1000".to_string())
        .parse()
        .expect("GEOCODE_DELAY_MS must be a number");

    // Create application state
    let state = AppState {
        datasets: Arc::new(datasets),
        resolver: Arc::new(Nominatim::new().expect("geocoding client")),
        geocode_delay: Duration::from_millis(geocode_delay_ms),
    };

    // Server configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .expect("PORT must be a valid number");
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Invalid HOST:PORT configuration");

    tracing::info!(
        "jobtrends-server v{} listening on {}",
        env!("CARGO_PKG_VERSION"),
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app(state)).await.unwrap();
}
