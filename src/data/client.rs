//! Google Distance Matrix API client
//!
//! Builds the request from the instance and per-call options, makes a single
//! GET through its [`Transport`], and caches the raw payload so the same request
//! is answered from cache for the configured TTL.

use std::sync::Arc;

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::options::parse_language;
use super::{
    ApiError, Avoid, DepartureTime, HttpTransport, MatrixResponse, RequestOptions, TrafficModel,
    Transport, TravelMode, Units,
};
use crate::cache::{CacheManager, CacheStore};
use crate::config::ClientConfig;

/// Namespace shared by every cache key this client writes
pub const CACHE_PREFIX: &str = "distmatrix_";

/// Separates fields inside the cache fingerprint
const KEY_SEPARATOR: [u8; 1] = [0x1f];

/// One or more addresses in the `|`-joined form the API expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locations(String);

impl Locations {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when no `|`-separated address has any content
    pub fn is_empty(&self) -> bool {
        self.0.split('|').all(|address| address.trim().is_empty())
    }

    fn join<S: AsRef<str>>(addresses: &[S]) -> Self {
        let joined: Vec<&str> = addresses.iter().map(|a| a.as_ref()).collect();
        Locations(joined.join("|"))
    }
}

impl From<&str> for Locations {
    fn from(value: &str) -> Self {
        Locations(value.to_string())
    }
}

impl From<String> for Locations {
    fn from(value: String) -> Self {
        Locations(value)
    }
}

impl From<&[&str]> for Locations {
    fn from(value: &[&str]) -> Self {
        Locations::join(value)
    }
}

impl From<&[String]> for Locations {
    fn from(value: &[String]) -> Self {
        Locations::join(value)
    }
}

impl From<Vec<&str>> for Locations {
    fn from(value: Vec<&str>) -> Self {
        Locations::join(&value)
    }
}

impl From<Vec<String>> for Locations {
    fn from(value: Vec<String>) -> Self {
        Locations::join(&value)
    }
}

impl<const N: usize> From<[&str; N]> for Locations {
    fn from(value: [&str; N]) -> Self {
        Locations::join(&value)
    }
}

/// Client for the Distance Matrix API
///
/// Holds a validated set of instance options that every call starts from.
/// Setters reject unknown values and leave the previous options untouched.
pub struct DistanceMatrixClient<T = HttpTransport> {
    config: ClientConfig,
    options: RequestOptions,
    cache: Option<Arc<dyn CacheStore>>,
    transport: T,
}

impl DistanceMatrixClient<HttpTransport> {
    /// Creates a client using the on-disk cache when caching is enabled
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let cache = if config.enable_cache {
            CacheManager::new().map(|manager| Arc::new(manager) as Arc<dyn CacheStore>)
        } else {
            None
        };
        Ok(Self::with_transport(config, cache, HttpTransport::new()?))
    }

    /// Creates a client backed by the given cache store
    pub fn with_cache(config: ClientConfig, cache: Arc<dyn CacheStore>) -> Result<Self, ApiError> {
        Ok(Self::with_transport(config, Some(cache), HttpTransport::new()?))
    }
}

impl<T: Transport> DistanceMatrixClient<T> {
    pub fn with_transport(
        config: ClientConfig,
        cache: Option<Arc<dyn CacheStore>>,
        transport: T,
    ) -> Self {
        Self {
            config,
            options: RequestOptions::defaults(),
            cache,
            transport,
        }
    }

    /// Current instance options
    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn set_mode(&mut self, mode: &str) -> Result<&mut Self, ApiError> {
        self.options.mode = Some(mode.parse::<TravelMode>()?);
        Ok(self)
    }

    pub fn set_units(&mut self, units: &str) -> Result<&mut Self, ApiError> {
        self.options.units = Some(units.parse::<Units>()?);
        Ok(self)
    }

    pub fn set_language(&mut self, language: &str) -> Result<&mut Self, ApiError> {
        self.options.language = Some(parse_language(language)?);
        Ok(self)
    }

    /// Sets or clears (`None`) the feature to avoid
    pub fn set_avoid(&mut self, avoid: Option<&str>) -> Result<&mut Self, ApiError> {
        self.options.avoid = avoid.map(str::parse::<Avoid>).transpose()?;
        Ok(self)
    }

    /// Sets or clears (`None`) the traffic model
    pub fn set_traffic_model(&mut self, traffic_model: Option<&str>) -> Result<&mut Self, ApiError> {
        self.options.traffic_model = traffic_model
            .map(str::parse::<TrafficModel>)
            .transpose()?;
        Ok(self)
    }

    /// Sets or clears (`None`) the departure time, `now` or a unix timestamp
    pub fn set_departure_time(
        &mut self,
        departure_time: Option<&str>,
    ) -> Result<&mut Self, ApiError> {
        self.options.departure_time = departure_time
            .map(str::parse::<DepartureTime>)
            .transpose()?;
        Ok(self)
    }

    /// Restores driving, metric, English and clears everything else
    pub fn reset_options(&mut self) -> &mut Self {
        self.options = RequestOptions::defaults();
        self
    }

    /// Cache key the given request would be stored under
    pub fn cache_key(
        &self,
        origins: impl Into<Locations>,
        destinations: impl Into<Locations>,
        options: &RequestOptions,
    ) -> String {
        let effective = self.options.merged_with(options);
        self.derive_key(&origins.into(), &destinations.into(), &effective)
    }

    fn derive_key(
        &self,
        origins: &Locations,
        destinations: &Locations,
        effective: &RequestOptions,
    ) -> String {
        let mut hasher = Sha256::new();
        hasher.update(origins.as_str().as_bytes());
        hasher.update(KEY_SEPARATOR);
        hasher.update(destinations.as_str().as_bytes());
        hasher.update(KEY_SEPARATOR);
        // BTreeMap iterates in sorted key order
        for (name, value) in effective.to_params() {
            hasher.update(name.as_bytes());
            hasher.update(b"=");
            hasher.update(value.as_bytes());
            hasher.update(KEY_SEPARATOR);
        }
        hasher.update(self.config.api_key.as_bytes());
        format!("{}{:x}", CACHE_PREFIX, hasher.finalize())
    }

    fn active_cache(&self) -> Option<&Arc<dyn CacheStore>> {
        if self.config.enable_cache {
            self.cache.as_ref()
        } else {
            None
        }
    }

    /// Calculates travel distance and time for every origin/destination pair
    ///
    /// # Arguments
    /// * `origins` - A single `|`-joined string or a list of addresses
    /// * `destinations` - Same forms as `origins`
    /// * `options` - Per-call options; set fields override the instance options
    ///
    /// # Returns
    /// * `Ok(MatrixResponse)` - Fresh or cached result
    /// * `Err(ApiError)` - Transport, parse or top-level API status failure
    pub async fn calculate(
        &self,
        origins: impl Into<Locations>,
        destinations: impl Into<Locations>,
        options: &RequestOptions,
    ) -> Result<MatrixResponse, ApiError> {
        let origins = origins.into();
        let destinations = destinations.into();
        if origins.is_empty() {
            return Err(ApiError::InvalidOption {
                option: "origins",
                value: origins.0,
            });
        }
        if destinations.is_empty() {
            return Err(ApiError::InvalidOption {
                option: "destinations",
                value: destinations.0,
            });
        }

        let effective = self.options.merged_with(options);
        let cache_key = self.derive_key(&origins, &destinations, &effective);

        if let Some(cache) = self.active_cache() {
            if let Some(cached) = cache.get(&cache_key) {
                debug!(key = %cache_key, "Distance Matrix cache hit");
                return Ok(MatrixResponse::from_value(cached)?);
            }
            debug!(key = %cache_key, "Distance Matrix cache miss");
        }

        let mut params: Vec<(&str, String)> = effective.to_params().into_iter().collect();
        params.push(("origins", origins.0));
        params.push(("destinations", destinations.0));
        params.push(("key", self.config.api_key.clone()));

        let body = self.transport.get(&params).await?;
        let payload: Value = serde_json::from_str(&body)?;

        let status = payload.get("status").and_then(Value::as_str).unwrap_or_default();
        if status != "OK" {
            let message = payload
                .get("error_message")
                .and_then(Value::as_str)
                .map(str::to_string);
            return Err(ApiError::ApiStatus {
                code: status.to_string(),
                message,
            });
        }

        // Cache only payloads that decode
        let response = MatrixResponse::from_value(payload.clone())?;

        if let Some(cache) = self.active_cache() {
            if let Err(e) = cache.set(&cache_key, &payload, self.config.cache_ttl_seconds) {
                warn!(key = %cache_key, error = %e, "Failed to cache Distance Matrix response");
            }
        }

        let (rows, columns) = response.dimensions();
        info!(rows, columns, complete = response.is_complete(), "Distance Matrix calculated");
        Ok(response)
    }

    /// Clears cached responses
    ///
    /// With an identifier, deletes that single key (the namespace prefix is
    /// added when missing) and reports whether anything was removed. Without
    /// one, deletes the whole namespace and reports whether the store completed
    /// the bulk delete. Returns `false` when no cache is configured.
    pub fn clear_cache(&self, identifier: Option<&str>) -> bool {
        let Some(cache) = self.cache.as_ref() else {
            return false;
        };

        match identifier {
            Some(identifier) => {
                let key = if identifier.starts_with(CACHE_PREFIX) {
                    identifier.to_string()
                } else {
                    format!("{}{}", CACHE_PREFIX, identifier)
                };
                let deleted = cache.delete(&key);
                info!(key = %key, deleted, "Cleared Distance Matrix cache entry");
                deleted
            }
            None => match cache.delete_by_prefix(CACHE_PREFIX) {
                Ok(removed) => {
                    info!(removed, "Cleared Distance Matrix cache");
                    true
                }
                Err(e) => {
                    warn!(error = %e, "Failed to clear Distance Matrix cache");
                    false
                }
            },
        }
    }
}
