use crate::config::{Config, ConfigStore, Endpoint};
use crate::errors::{CitizenError, Operation};
use crate::factory::{make_citizens, POPULATION_SIZE};
use crate::masks::{matches_masked_field, remove_cns_mask, remove_cpf_mask};
use crate::models::*;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Artificial latency applied before every mock response.
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(1000);

/// Citizen lookup and creation, backed either by a configured HTTP backend
/// or by deterministic mock data.
///
/// The backend/mock decision is made on every call from the current
/// configuration snapshot: an operation goes to the backend only when both
/// the base URL and its endpoint path are set.
#[derive(Clone)]
pub struct CitizenService {
    client: Client,
    config: ConfigStore,
    mock_delay: Duration,
}

impl CitizenService {
    /// Creates a new `CitizenService` reading its settings from `config`.
    pub fn new(config: ConfigStore) -> Result<Self, CitizenError> {
        let client = Client::builder()
            .build()
            .map_err(|e| CitizenError::Client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            mock_delay: DEFAULT_MOCK_DELAY,
        })
    }

    /// Overrides the artificial latency of mock responses.
    pub fn with_mock_delay(mut self, delay: Duration) -> Self {
        self.mock_delay = delay;
        self
    }

    /// Configuration store consulted on every call.
    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Lists one page of citizens.
    ///
    /// In mock mode the 150-citizen population is filtered by
    /// `search_string`, paginated, and projected to `fields`. In backend mode
    /// the response body is returned untouched.
    pub async fn index(
        &self,
        params: &IndexParams,
    ) -> Result<CitizenPayload<CitizenPage>, CitizenError> {
        params.validate()?;
        let config = self.config.get();

        if !config.is_custom_endpoint_set(Endpoint::Index) {
            self.delay().await;
            return Ok(CitizenPayload::Mock(index_mock(params)));
        }

        let body = self
            .get(&config, Endpoint::Index, Operation::Index, &params.to_query())
            .await?;
        Ok(CitizenPayload::Remote(body))
    }

    /// Unpaginated search used by the citizen select.
    ///
    /// An empty search string returns no citizens in mock mode.
    pub async fn search(
        &self,
        params: &SearchParams,
    ) -> Result<CitizenPayload<Vec<CitizenFields>>, CitizenError> {
        let config = self.config.get();

        if !config.is_custom_endpoint_set(Endpoint::Search) {
            self.delay().await;
            return Ok(CitizenPayload::Mock(search_mock(params)));
        }

        let query = [("searchString", params.search_string.clone())];
        let body = self
            .get(&config, Endpoint::Search, Operation::Search, &query)
            .await?;
        Ok(CitizenPayload::Remote(body))
    }

    /// Creates a citizen.
    ///
    /// Mock mode echoes `params` with placeholder values; it is a stand-in,
    /// not realistic data.
    pub async fn create(
        &self,
        params: &CreateCitizenParams,
    ) -> Result<CitizenPayload<CreatedCitizen>, CitizenError> {
        let config = self.config.get();

        if !config.is_custom_endpoint_set(Endpoint::Create) {
            self.delay().await;
            return Ok(CitizenPayload::Mock(create_mock(params)));
        }

        let url = config.url_for(Endpoint::Create);
        tracing::info!("Creating citizen via backend: {}", url);

        let result = self
            .client
            .post(&url)
            .json(&json!({ "params": params }))
            .send()
            .await;

        let body = read_body(result)
            .await
            .map_err(|message| handle_error(Operation::Create, message))?;
        Ok(CitizenPayload::Remote(body))
    }

    async fn get<Q: serde::Serialize + ?Sized>(
        &self,
        config: &Config,
        endpoint: Endpoint,
        operation: Operation,
        query: &Q,
    ) -> Result<Value, CitizenError> {
        let url = config.url_for(endpoint);
        tracing::info!("Fetching citizens ({}) from backend: {}", endpoint.as_str(), url);

        let result = self.client.get(&url).query(query).send().await;

        read_body(result)
            .await
            .map_err(|message| handle_error(operation, message))
    }

    async fn delay(&self) {
        if !self.mock_delay.is_zero() {
            tokio::time::sleep(self.mock_delay).await;
        }
    }
}

/// Reads a successful body, or the message describing why there is none.
///
/// JSON bodies are parsed; any other text is kept as a string and an empty
/// body becomes `null`.
async fn read_body(result: Result<reqwest::Response, reqwest::Error>) -> Result<Value, String> {
    let response = result.map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        return Err(format!(
            "Request failed with status code {}",
            response.status().as_u16()
        ));
    }

    let text = response.text().await.map_err(|e| e.to_string())?;
    Ok(body_value(text))
}

fn body_value(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text))
}

/// Logs a transport failure once and wraps it.
fn handle_error(operation: Operation, message: String) -> CitizenError {
    let error = CitizenError::transport(operation, message);
    tracing::error!("{}", error);
    error
}

// ============ Mock Pipeline ============

fn index_mock(params: &IndexParams) -> CitizenPage {
    let mut citizens = make_citizens(POPULATION_SIZE, &CitizenOverrides::default());

    if let Some(search) = params.search_string.as_deref().filter(|s| !s.is_empty()) {
        citizens = filter_citizens(citizens, search);
    }

    let per_page = params.effective_per_page();
    let total = citizens.len();
    let page: Vec<CitizenFields> = paginate(&citizens, params.page, per_page)
        .iter()
        .map(Citizen::to_fields)
        .collect();

    let data = match params.fields.as_deref() {
        Some(fields) if !fields.is_empty() => page
            .into_iter()
            .map(|citizen| project_fields(citizen, fields))
            .collect(),
        _ => page,
    };

    tracing::debug!(
        "Mock index: {} matching citizens, returning {} on page {}",
        total,
        data.len(),
        params.page
    );

    CitizenPage {
        data,
        meta: PageMeta {
            current_page: params.page,
            per_page,
            total,
            last_page: total.div_ceil(per_page as usize),
        },
    }
}

fn search_mock(params: &SearchParams) -> Vec<CitizenFields> {
    if params.search_string.is_empty() {
        return Vec::new();
    }

    let citizens = make_citizens(POPULATION_SIZE, &CitizenOverrides::default());
    filter_citizens(citizens, &params.search_string)
        .iter()
        .map(Citizen::to_fields)
        .collect()
}

fn create_mock(params: &CreateCitizenParams) -> CreatedCitizen {
    CreatedCitizen {
        citizen: CreatedCitizenRecord {
            params: params.clone(),
            race: "string".to_string(),
            co_cidadao: 1,
            is_dead: false,
            mother_name: "a".to_string(),
        },
    }
}

/// Keeps citizens whose name contains `search` (case-insensitive) or whose
/// CPF/CNS contains it once masks are removed.
pub fn filter_citizens(citizens: Vec<Citizen>, search: &str) -> Vec<Citizen> {
    let needle = search.to_lowercase();
    citizens
        .into_iter()
        .filter(|citizen| {
            citizen.name.to_lowercase().contains(&needle)
                || matches_masked_field(search, &citizen.cpf, remove_cpf_mask)
                || matches_masked_field(search, &citizen.cns, remove_cns_mask)
        })
        .collect()
}

/// Slice `[(page-1)*per_page, page*per_page)`, clamped to the available records.
pub fn paginate<T>(items: &[T], page: u32, per_page: u32) -> &[T] {
    let per_page = per_page as usize;
    let start = (page.saturating_sub(1) as usize)
        .saturating_mul(per_page)
        .min(items.len());
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

/// Drops every key that is neither requested nor one of [`DEFAULT_FIELDS`].
pub fn project_fields(citizen: CitizenFields, fields: &[String]) -> CitizenFields {
    citizen
        .into_iter()
        .filter(|(key, _)| {
            fields.iter().any(|f| f == key) || DEFAULT_FIELDS.contains(&key.as_str())
        })
        .collect()
}
