use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Logical operations that can be redirected to a real backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Index,
    Create,
    Search,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Index => "index",
            Endpoint::Create => "create",
            Endpoint::Search => "search",
        }
    }
}

/// Endpoint paths appended to `api_base_url`. An empty path means "not configured".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub index: String,
    pub create: String,
    pub search: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            index: "/citizens".to_string(),
            create: String::new(),
            search: String::new(),
        }
    }
}

/// Immutable configuration snapshot consulted by the citizen service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the real backend. Empty keeps every operation in mock mode.
    pub api_base_url: String,
    pub endpoints: Endpoints,
}

/// Partial endpoint map; unset keys keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct EndpointsPatch {
    pub index: Option<String>,
    pub create: Option<String>,
    pub search: Option<String>,
}

/// Partial configuration accepted by [`ConfigStore::set`].
#[derive(Debug, Clone, Default)]
pub struct ConfigPatch {
    pub api_base_url: Option<String>,
    pub endpoints: Option<EndpointsPatch>,
}

impl Config {
    /// Returns a new snapshot with `patch` applied over `self`.
    ///
    /// Top-level values are replaced when present; endpoints are merged key by key.
    pub fn merge(&self, patch: ConfigPatch) -> Config {
        let mut endpoints = self.endpoints.clone();
        if let Some(p) = patch.endpoints {
            if let Some(index) = p.index {
                endpoints.index = index;
            }
            if let Some(create) = p.create {
                endpoints.create = create;
            }
            if let Some(search) = p.search {
                endpoints.search = search;
            }
        }

        Config {
            api_base_url: patch
                .api_base_url
                .unwrap_or_else(|| self.api_base_url.clone()),
            endpoints,
        }
    }

    pub fn endpoint(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Index => &self.endpoints.index,
            Endpoint::Create => &self.endpoints.create,
            Endpoint::Search => &self.endpoints.search,
        }
    }

    /// True when both the base URL and the endpoint path are set.
    pub fn is_custom_endpoint_set(&self, endpoint: Endpoint) -> bool {
        !self.api_base_url.is_empty() && !self.endpoint(endpoint).is_empty()
    }

    /// Full URL for a configured endpoint.
    pub fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.api_base_url, self.endpoint(endpoint))
    }

    /// Loads configuration from the environment (and `.env` if present).
    ///
    /// Recognized variables: `CITIZEN_API_BASE_URL`, `CITIZEN_ENDPOINT_INDEX`,
    /// `CITIZEN_ENDPOINT_CREATE`, `CITIZEN_ENDPOINT_SEARCH`. Missing variables
    /// keep their defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url = std::env::var("CITIZEN_API_BASE_URL")
            .ok()
            .map(|url| url.trim().to_string())
            .map(|url| {
                if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://")
                {
                    anyhow::bail!("CITIZEN_API_BASE_URL must start with http:// or https://");
                }
                Ok(url)
            })
            .transpose()?;

        let patch = ConfigPatch {
            api_base_url,
            endpoints: Some(EndpointsPatch {
                index: std::env::var("CITIZEN_ENDPOINT_INDEX").ok(),
                create: std::env::var("CITIZEN_ENDPOINT_CREATE").ok(),
                search: std::env::var("CITIZEN_ENDPOINT_SEARCH").ok(),
            }),
        };
        let config = Config::default().merge(patch);

        if config.api_base_url.is_empty() {
            tracing::info!("No CITIZEN_API_BASE_URL set, citizen operations use mock data");
        } else {
            tracing::info!("Citizen backend configured: {}", config.api_base_url);
        }
        tracing::debug!("Citizen endpoints: {:?}", config.endpoints);

        Ok(config)
    }
}

/// Shared handle to the current configuration snapshot.
///
/// Cloning the store shares the same snapshot; readers get an `Arc<Config>`
/// that never changes underneath them.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    current: Arc<RwLock<Arc<Config>>>,
}

impl ConfigStore {
    pub fn new(config: Config) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    pub fn get(&self) -> Arc<Config> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Replaces the stored snapshot with `patch` merged over the defaults.
    pub fn set(&self, patch: ConfigPatch) -> Arc<Config> {
        let next = Arc::new(Config::default().merge(patch));
        match self.current.write() {
            Ok(mut guard) => *guard = Arc::clone(&next),
            Err(poisoned) => *poisoned.into_inner() = Arc::clone(&next),
        }
        next
    }
}

/// Settings for the mock backend binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub mock_delay: Duration,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?;
        let mock_delay_ms: u64 = std::env::var("CITIZEN_MOCK_DELAY_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("CITIZEN_MOCK_DELAY_MS must be a number of milliseconds"))?;

        tracing::debug!("Server Port: {}", port);
        tracing::debug!("Mock delay: {}ms", mock_delay_ms);

        Ok(Self {
            port,
            mock_delay: Duration::from_millis(mock_delay_ms),
        })
    }
}
