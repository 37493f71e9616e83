//! API route handlers

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use dataset::company::{leaderboard, melt_both, melt_single, LeaderboardRow, PostingMetric};
use dataset::location;
use dataset::series::{filter_range, intensity_table, count_pairs, IntensityRow};
use dataset::{LocationRecord, MonthlyPoint};
use geocode::resolve_all;
use sarima::{export, forecast_monthly, ForecastConfig, ForecastReport, SarimaError};

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error envelope every handler shares: a status code and a message body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<SarimaError> for ApiError {
    fn from(error: SarimaError) -> Self {
        let status = match &error {
            // The caller asked for something malformed.
            SarimaError::InvalidParameter { .. } | SarimaError::InsufficientData { .. } => {
                StatusCode::BAD_REQUEST
            }
            // The request was well formed but this window cannot be modelled.
            SarimaError::SearchExhausted | SarimaError::NonPositiveCount { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CompanyQuery {
    /// "total", "unique" or "both" (default).
    pub metric: Option<String>,
    /// How many companies to rank, default 5.
    pub top: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CompaniesResponse {
    pub metric: String,
    pub rows: Vec<LeaderboardRow>,
}

pub async fn companies(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
) -> Result<Json<CompaniesResponse>, ApiError> {
    let metric = query.metric.unwrap_or_else(|| "both".to_string());
    let top_n = query.top.unwrap_or(5);

    let rows = match metric.as_str() {
        "both" => {
            // The combined view ranks by total postings.
            let top = leaderboard(&state.datasets.companies, PostingMetric::Total, top_n);
            melt_both(&top)
        }
        other => {
            let parsed: PostingMetric = other.parse().map_err(ApiError::bad_request)?;
            let top = leaderboard(&state.datasets.companies, parsed, top_n);
            melt_single(&top, parsed)
        }
    };

    Ok(Json(CompaniesResponse { metric, rows }))
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct StatesResponse {
    pub states: Vec<String>,
}

pub async fn states(State(state): State<AppState>) -> Json<StatesResponse> {
    Json(StatesResponse {
        states: location::states(&state.datasets.locations),
    })
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub state: String,
}

/// One pin on the county map.
#[derive(Debug, Serialize)]
pub struct LocationMarker {
    pub county: String,
    pub latitude: f64,
    pub longitude: f64,
    pub median_salary: f64,
    pub unique_postings: u64,
    pub median_duration_days: u32,
}

#[derive(Debug, Serialize)]
pub struct SalarySummary {
    pub highest: LocationRecord,
    pub lowest: LocationRecord,
}

#[derive(Debug, Serialize)]
pub struct LocationsResponse {
    pub state: String,
    pub counties: Vec<LocationRecord>,
    pub markers: Vec<LocationMarker>,
    /// Heat layer triples: latitude, longitude, median salary weight.
    pub heat: Vec<(f64, f64, f64)>,
    /// Counties the lookup service could not place.
    pub unlocated: Vec<String>,
    pub salary: Option<SalarySummary>,
}

pub async fn locations(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<LocationsResponse>, ApiError> {
    let counties = location::filter_state(&state.datasets.locations, &query.state);
    let salary = location::salary_extremes(&counties).map(|(highest, lowest)| SalarySummary {
        highest: highest.clone(),
        lowest: lowest.clone(),
    });

    // Geocoding is blocking, throttled network IO; keep it off the runtime.
    let names: Vec<String> = counties.iter().map(|r| r.county.clone()).collect();
    let resolver = state.resolver.clone();
    let delay = state.geocode_delay;
    let outcome = tokio::task::spawn_blocking(move || resolve_all(resolver.as_ref(), &names, delay))
        .await
        .map_err(|e| ApiError::internal(format!("geocoding task failed: {e}")))?;

    let by_county: HashMap<&str, &LocationRecord> =
        counties.iter().map(|r| (r.county.as_str(), r)).collect();
    let markers: Vec<LocationMarker> = outcome
        .located
        .iter()
        .filter_map(|place| {
            by_county.get(place.place.as_str()).map(|record| LocationMarker {
                county: record.county.clone(),
                latitude: place.coordinates.latitude,
                longitude: place.coordinates.longitude,
                median_salary: record.median_salary,
                unique_postings: record.unique_postings,
                median_duration_days: record.median_duration_days,
            })
        })
        .collect();
    let heat = markers
        .iter()
        .map(|m| (m.latitude, m.longitude, m.median_salary))
        .collect();

    Ok(Json(LocationsResponse {
        state: query.state.trim().to_uppercase(),
        counties,
        markers,
        heat,
        unlocated: outcome.missing,
        salary,
    }))
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SeriesQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    pub points: Vec<MonthlyPoint>,
    pub intensity: Vec<IntensityRow>,
}

pub async fn series(
    State(state): State<AppState>,
    Query(query): Query<SeriesQuery>,
) -> Json<SeriesResponse> {
    let points = filter_range(&state.datasets.series, query.start, query.end);
    let intensity = intensity_table(&points);
    Json(SeriesResponse { points, intensity })
}

// ---------------------------------------------------------------------------
// Forecast
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    /// Restrict the training window; both bounds optional and inclusive.
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[serde(default = "default_horizon")]
    pub horizon: usize,
    #[serde(default = "default_seasonal_d")]
    pub seasonal_d: usize,
    #[serde(default = "default_period")]
    pub period: usize,
}

fn default_horizon() -> usize {
    12
}

fn default_seasonal_d() -> usize {
    1
}

fn default_period() -> usize {
    12
}

impl ForecastRequest {
    fn config(&self) -> ForecastConfig {
        ForecastConfig {
            horizon: self.horizon,
            seasonal_d: self.seasonal_d,
            period: self.period,
            ..ForecastConfig::default()
        }
    }
}

fn run_forecast(
    state: &AppState,
    request: &ForecastRequest,
) -> Result<ForecastReport, ApiError> {
    let window = filter_range(&state.datasets.series, request.start, request.end);
    let pairs = count_pairs(&window);
    Ok(forecast_monthly(&pairs, &request.config())?)
}

pub async fn forecast(
    State(state): State<AppState>,
    Json(request): Json<ForecastRequest>,
) -> Result<Json<ForecastReport>, ApiError> {
    run_forecast(&state, &request).map(Json)
}

pub async fn forecast_export(
    State(state): State<AppState>,
    Query(request): Query<ForecastRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let report = run_forecast(&state, &request)?;
    let body = export::to_csv_string(&report.points)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"forecasted_job_postings.csv\"",
            ),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Datasets;
    use chrono::Months;
    use dataset::CompanyRecord;
    use geocode::{Coordinates, GeocodeError, PlaceResolver};
    use std::sync::Arc;
    use std::time::Duration;

    struct ScriptedResolver;

    impl PlaceResolver for ScriptedResolver {
        fn name(&self) -> &str {
            "scripted"
        }

        fn resolve(&self, place: &str) -> geocode::Result<Option<Coordinates>> {
            match place {
                "Travis County, TX" => Ok(Some(Coordinates {
                    latitude: 30.3,
                    longitude: -97.7,
                })),
                "Harris County, TX" => Ok(None),
                _ => Err(GeocodeError::Unavailable("offline".to_string())),
            }
        }
    }

    fn month(year: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, m, 1).unwrap()
    }

    fn test_state() -> AppState {
        let companies = vec![
            CompanyRecord {
                company: "Acme".into(),
                total_postings: 120,
                unique_postings: 40,
                median_duration_days: 31,
            },
            CompanyRecord {
                company: "Globex".into(),
                total_postings: 90,
                unique_postings: 60,
                median_duration_days: 28,
            },
        ];
        let locations = vec![
            LocationRecord {
                county: "Travis County, TX".into(),
                state: "TX".into(),
                median_salary: 95_000.0,
                unique_postings: 800,
                median_duration_days: 30,
            },
            LocationRecord {
                county: "Harris County, TX".into(),
                state: "TX".into(),
                median_salary: 88_000.0,
                unique_postings: 1200,
                median_duration_days: 27,
            },
            LocationRecord {
                county: "King County, WA".into(),
                state: "WA".into(),
                median_salary: 120_000.0,
                unique_postings: 900,
                median_duration_days: 25,
            },
        ];
        let series = (0..48)
            .map(|i| MonthlyPoint {
                month: month(2021, 1) + Months::new(i as u32),
                unique_postings: (500.0
                    + i as f64 * 6.0
                    + 40.0 * (i as f64 * std::f64::consts::TAU / 12.0).sin()
                    + ((i * 29) % 13) as f64) as u64,
                posting_intensity: 5.0,
            })
            .collect();

        AppState {
            datasets: Arc::new(Datasets {
                companies,
                locations,
                series,
            }),
            resolver: Arc::new(ScriptedResolver),
            geocode_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_companies_both_view() {
        let response = companies(
            State(test_state()),
            Query(CompanyQuery {
                metric: None,
                top: Some(2),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.0.metric, "both");
        assert_eq!(response.0.rows.len(), 4);
        assert_eq!(response.0.rows[0].company, "Acme");
        assert_eq!(response.0.rows[0].ratio_label, "3:1");
    }

    #[tokio::test]
    async fn test_companies_single_view() {
        let response = companies(
            State(test_state()),
            Query(CompanyQuery {
                metric: Some("unique".to_string()),
                top: Some(1),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.0.rows.len(), 1);
        assert_eq!(response.0.rows[0].company, "Globex");
        assert_eq!(response.0.rows[0].postings, 60);
    }

    #[tokio::test]
    async fn test_companies_rejects_unknown_view() {
        let result = companies(
            State(test_state()),
            Query(CompanyQuery {
                metric: Some("median".to_string()),
                top: None,
            }),
        )
        .await;
        let error = result.err().unwrap();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_states_sorted() {
        let response = states(State(test_state())).await;
        assert_eq!(response.0.states, vec!["TX", "WA"]);
    }

    #[tokio::test]
    async fn test_locations_markers_and_misses() {
        let response = locations(
            State(test_state()),
            Query(LocationQuery {
                state: "tx".to_string(),
            }),
        )
        .await
        .unwrap();
        let body = response.0;
        assert_eq!(body.state, "TX");
        assert_eq!(body.counties.len(), 2);
        assert_eq!(body.markers.len(), 1);
        assert_eq!(body.markers[0].county, "Travis County, TX");
        assert_eq!(body.heat, vec![(30.3, -97.7, 95_000.0)]);
        assert_eq!(body.unlocated, vec!["Harris County, TX".to_string()]);
        let salary = body.salary.unwrap();
        assert_eq!(salary.highest.county, "Travis County, TX");
        assert_eq!(salary.lowest.county, "Harris County, TX");
    }

    #[tokio::test]
    async fn test_locations_unknown_state_is_empty() {
        let response = locations(
            State(test_state()),
            Query(LocationQuery {
                state: "ZZ".to_string(),
            }),
        )
        .await
        .unwrap();
        let body = response.0;
        assert!(body.counties.is_empty());
        assert!(body.markers.is_empty());
        assert!(body.salary.is_none());
    }

    #[tokio::test]
    async fn test_series_range() {
        let response = series(
            State(test_state()),
            Query(SeriesQuery {
                start: Some(month(2021, 3)),
                end: Some(month(2021, 5)),
            }),
        )
        .await;
        assert_eq!(response.0.points.len(), 3);
        assert_eq!(response.0.intensity.len(), 3);
        assert_eq!(response.0.points[0].month, month(2021, 3));
    }

    #[tokio::test]
    async fn test_forecast_happy_path() {
        let response = forecast(
            State(test_state()),
            Json(ForecastRequest {
                start: None,
                end: None,
                horizon: 6,
                seasonal_d: 0,
                period: 12,
            }),
        )
        .await
        .unwrap();
        let report = response.0;
        assert_eq!(report.points.len(), 6);
        assert_eq!(report.points[0].month, month(2025, 1));
        assert!(report.points.iter().all(|p| p.value > 0.0));
    }

    #[tokio::test]
    async fn test_forecast_window_too_small_is_unprocessable() {
        let result = forecast(
            State(test_state()),
            Json(ForecastRequest {
                start: Some(month(2021, 1)),
                end: Some(month(2021, 5)),
                horizon: 6,
                seasonal_d: 0,
                period: 12,
            }),
        )
        .await;
        let error = result.err().unwrap();
        assert_eq!(error.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_forecast_rejects_bad_horizon() {
        let result = forecast(
            State(test_state()),
            Json(ForecastRequest {
                start: None,
                end: None,
                horizon: 0,
                seasonal_d: 0,
                period: 12,
            }),
        )
        .await;
        let error = result.err().unwrap();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_forecast_export_csv() {
        let response = forecast_export(
            State(test_state()),
            Query(ForecastRequest {
                start: None,
                end: None,
                horizon: 3,
                seasonal_d: 0,
                period: 12,
            }),
        )
        .await
        .unwrap()
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/csv"
        );
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(disposition.contains("forecasted_job_postings.csv"));
    }
}
