//! HTTP client implementation

use crate::config::HttpConfig;
use crate::errors::HttpError;
use crate::types::{HttpMethod, HttpResponse};
use reqwest::{redirect, Client};
use std::sync::Arc;
use tracing::{debug, trace};
use url::Url;

/// The request capability a simulated user is handed
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a GET for `path`, relative to the client's base URL
    async fn get(&self, path: &str) -> Result<HttpResponse, HttpError>;
}

#[async_trait::async_trait]
impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    async fn get(&self, path: &str) -> Result<HttpResponse, HttpError> {
        (**self).get(path).await
    }
}

/// reqwest-backed client bound to one base URL.
///
/// The underlying `reqwest::Client` is built once and cloned cheaply, so all
/// simulated users sharing a manager share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpManager {
    client: Client,
    base_url: Url,
    config: HttpConfig,
}

impl HttpManager {
    /// Create a manager for `base_url` with default configuration
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        Self::with_config(base_url, HttpConfig::default())
    }

    /// Create a manager for `base_url` with specific configuration
    pub fn with_config(base_url: &str, config: HttpConfig) -> Result<Self, HttpError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(HttpError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }

        debug!(
            "Creating HttpManager for {} with timeout: {}s",
            base_url,
            config.timeout.as_secs()
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .redirect(redirect::Policy::limited(config.max_redirects as usize))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            .build()
            .map_err(|e| HttpError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Resolve `path` against the base URL.
    ///
    /// The path is appended to the base URL's own path rather than replacing
    /// it, so a host of `http://svc/api` and a path of `/clusters/x` yield
    /// `http://svc/api/clusters/x`. A query or fragment on the base URL is
    /// kept after the joined path.
    pub fn url_for(&self, path: &str) -> Result<Url, HttpError> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Url::parse(path).map_err(|e| HttpError::InvalidUrl(format!("{}: {}", path, e)));
        }

        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        Ok(url)
    }

    /// Send a body-less request and drain the response
    pub async fn send(&self, method: HttpMethod, path: &str) -> Result<HttpResponse, HttpError> {
        let url = self.url_for(path)?;
        trace!("{} {}", method, url);

        let response = self.client.request(method.into(), url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        trace!("{} {} -> {} ({} bytes)", method, path, status, body.len());
        Ok(HttpResponse::new(status, body.len()))
    }
}

#[async_trait::async_trait]
impl HttpClient for HttpManager {
    async fn get(&self, path: &str) -> Result<HttpResponse, HttpError> {
        self.send(HttpMethod::Get, path).await
    }
}
