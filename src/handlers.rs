use crate::errors::CitizenError;
use crate::models::*;
use crate::service::CitizenService;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Citizen service answering every route.
    pub service: CitizenService,
}

/// Body of `POST /citizens`, matching what the service sends to a backend.
#[derive(Debug, Deserialize)]
pub struct CreateCitizenBody {
    pub params: CreateCitizenParams,
}

impl<T: serde::Serialize> IntoResponse for CitizenPayload<T> {
    fn into_response(self) -> Response {
        match self {
            CitizenPayload::Remote(body) => Json(body).into_response(),
            CitizenPayload::Mock(value) => Json(value).into_response(),
        }
    }
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-citizen-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Builds [`IndexParams`] from raw query pairs.
///
/// Accepts `page`, `perPage`, `searchString`, and fields either as repeated
/// `fields[]` pairs or as a comma-separated `fields` value. A missing page
/// means page 1.
pub fn parse_index_query(pairs: &[(String, String)]) -> Result<IndexParams, CitizenError> {
    let mut params = IndexParams {
        page: 1,
        ..Default::default()
    };
    let mut fields: Vec<String> = Vec::new();

    for (key, value) in pairs {
        match key.as_str() {
            "page" => {
                params.page = value.parse().map_err(|_| {
                    CitizenError::InvalidParams(format!("page must be a number, got '{}'", value))
                })?;
            }
            "perPage" => {
                params.per_page = Some(value.parse().map_err(|_| {
                    CitizenError::InvalidParams(format!(
                        "perPage must be a number, got '{}'",
                        value
                    ))
                })?);
            }
            "searchString" => params.search_string = Some(value.clone()),
            "fields[]" => fields.push(value.clone()),
            "fields" => fields.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(String::from),
            ),
            _ => {}
        }
    }

    if !fields.is_empty() {
        params.fields = Some(fields);
    }
    Ok(params)
}

/// GET /citizens
///
/// Paginated listing with optional search and field projection.
pub async fn index_citizens(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<CitizenPayload<CitizenPage>, CitizenError> {
    let params = parse_index_query(&pairs)?;
    tracing::info!("GET /citizens - params: {:?}", params);

    state.service.index(&params).await
}

/// GET /citizens/search
///
/// Unpaginated search used by the citizen select.
pub async fn search_citizens(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<CitizenPayload<Vec<CitizenFields>>, CitizenError> {
    tracing::info!("GET /citizens/search - searchString: {:?}", params.search_string);

    state.service.search(&params).await
}

/// POST /citizens
pub async fn create_citizen(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateCitizenBody>,
) -> Result<(StatusCode, CitizenPayload<CreatedCitizen>), CitizenError> {
    tracing::info!("POST /citizens - name: {}", body.params.name);

    let created = state.service.create(&body.params).await?;
    Ok((StatusCode::CREATED, created))
}

/// Routes of the mock citizen backend.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/citizens", get(index_citizens).post(create_citizen))
        .route("/citizens/search", get(search_citizens))
        .with_state(state)
}
