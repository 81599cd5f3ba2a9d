//! Binance spot REST API client implementation.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use reqwest_tracing::TracingMiddleware;

use crate::auth::{CredentialsProvider, SystemTimestamp, TimestampProvider, sign_query};
use crate::error::{ApiError, BinanceError};
use crate::rate_limit::{AdmissionController, RateLimitDescriptor};
use crate::spot::rest::endpoints::{BINANCE_BASE_URL, public, weights};

/// The Binance spot REST API client.
///
/// The client discovers the exchange's published rate limits once at
/// construction and enforces them locally: every request declares a weight and
/// is admitted against all published `REQUEST_WEIGHT` windows before it is
/// dispatched, suspending instead of violating a limit.
///
/// # Example
///
/// ```rust,no_run
/// use binance_api_client::spot::rest::SpotRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Fetches exchangeInfo and builds the local rate gates.
///     let client = SpotRestClient::connect().await?;
///
///     let price = client.get_price("BTCUSDT").await?;
///     println!("BTCUSDT: {}", price.price);
///
///     Ok(())
/// }
/// ```
///
/// For signed endpoints, provide credentials:
///
/// ```rust,no_run
/// use binance_api_client::spot::rest::SpotRestClient;
/// use binance_api_client::auth::StaticCredentials;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let credentials = Arc::new(StaticCredentials::new("api_key", "api_secret"));
///     let client = SpotRestClient::builder()
///         .credentials(credentials)
///         .connect()
///         .await?;
///
///     let account = client.get_account().await?;
///     println!("Balances: {:?}", account.balances);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct SpotRestClient {
    http_client: ClientWithMiddleware,
    base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    timestamp_provider: Arc<dyn TimestampProvider>,
    recv_window: u64,
    admission: Arc<AdmissionController>,
    rate_limits: Arc<Vec<RateLimitDescriptor>>,
}

impl SpotRestClient {
    /// Connect with default settings.
    ///
    /// Fetches the exchange's published rate limits and builds the local
    /// admission gates. Fails fast if the metadata endpoint is unreachable:
    /// no client is usable without known limits.
    pub async fn connect() -> Result<Self, BinanceError> {
        Self::builder().connect().await
    }

    /// Create a new client builder.
    pub fn builder() -> SpotRestClientBuilder {
        SpotRestClientBuilder::new()
    }

    /// The rate limit rules this client enforces locally.
    pub fn rate_limits(&self) -> &[RateLimitDescriptor] {
        &self.rate_limits
    }

    /// The admission controller shared by every request on this client.
    pub fn admission(&self) -> &AdmissionController {
        &self.admission
    }

    /// Make a public GET request.
    pub(crate) async fn public_get<T>(&self, endpoint: &str, weight: u32) -> Result<T, BinanceError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        self.admission.admit(weight).await?;
        let response = self.http_client.get(&url).send().await?;
        self.parse_response(response).await
    }

    /// Make a public GET request with query parameters.
    pub(crate) async fn public_get_with_params<T, Q>(
        &self,
        endpoint: &str,
        params: &Q,
        weight: u32,
    ) -> Result<T, BinanceError>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let query_string = serde_urlencoded::to_string(params)
            .map_err(|e| BinanceError::Config(format!("unserializable request: {e}")))?;
        let url = if query_string.is_empty() {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}{}?{}", self.base_url, endpoint, query_string)
        };
        self.admission.admit(weight).await?;
        let response = self.http_client.get(&url).send().await?;
        self.parse_response(response).await
    }

    /// Make an authenticated GET request.
    ///
    /// The signed query carries `recvWindow` and a `timestamp` taken here, at
    /// request construction, so the server's replay window is measured against
    /// when the caller asked, not when admission finally let the request out.
    pub(crate) async fn signed_get<T, Q>(
        &self,
        endpoint: &str,
        params: &Q,
        weight: u32,
    ) -> Result<T, BinanceError>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let (query, api_key) = self.build_signed_query(params)?;
        let url = format!("{}{}?{}", self.base_url, endpoint, query);
        self.admission.admit(weight).await?;
        let response = self
            .http_client
            .get(&url)
            .header("X-MBX-APIKEY", api_key)
            .send()
            .await?;
        self.parse_response(response).await
    }

    /// Make an authenticated POST request.
    pub(crate) async fn signed_post<T, Q>(
        &self,
        endpoint: &str,
        params: &Q,
        weight: u32,
    ) -> Result<T, BinanceError>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let (query, api_key) = self.build_signed_query(params)?;
        let url = format!("{}{}", self.base_url, endpoint);
        self.admission.admit(weight).await?;
        let response = self
            .http_client
            .post(&url)
            .header("X-MBX-APIKEY", api_key)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(query)
            .send()
            .await?;
        self.parse_response(response).await
    }

    /// Serialize, timestamp, and sign the canonical query string.
    fn build_signed_query<Q>(&self, params: &Q) -> Result<(String, String), BinanceError>
    where
        Q: serde::Serialize + ?Sized,
    {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(BinanceError::MissingCredentials)?
            .get_credentials();

        let base = serde_urlencoded::to_string(params)
            .map_err(|e| BinanceError::Config(format!("unserializable request: {e}")))?;

        let timestamp = self.timestamp_provider.timestamp_millis();
        let mut query = if base.is_empty() {
            format!("recvWindow={}&timestamp={}", self.recv_window, timestamp)
        } else {
            format!("{}&recvWindow={}&timestamp={}", base, self.recv_window, timestamp)
        };

        // The signature covers the exact bytes sent, and goes last.
        let signature = sign_query(credentials, &query);
        query.push_str("&signature=");
        query.push_str(&signature);

        Ok((query, credentials.api_key.clone()))
    }

    /// Parse a response from the Binance API.
    async fn parse_response<T>(&self, response: reqwest::Response) -> Result<T, BinanceError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Binance error payloads look like {"code": -1121, "msg": "..."};
            // both fields are surfaced verbatim. A non-2xx body in any other
            // shape is a protocol error.
            return match serde_json::from_str::<ApiError>(&body) {
                Ok(api_error) => Err(BinanceError::Api(api_error)),
                Err(_) => Err(BinanceError::InvalidResponse(format!("HTTP {status}: {body}"))),
            };
        }

        serde_json::from_str(&body).map_err(|e| {
            BinanceError::InvalidResponse(format!("Failed to parse response: {e}. Body: {body}"))
        })
    }
}

impl std::fmt::Debug for SpotRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotRestClient")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.credentials.is_some())
            .field("rate_limits", &self.rate_limits.len())
            .finish()
    }
}

/// Parameter placeholder for signed requests that carry only the
/// authentication fields.
#[derive(serde::Serialize)]
pub(crate) struct NoParams {}

/// Builder for [`SpotRestClient`].
pub struct SpotRestClientBuilder {
    base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    timestamp_provider: Option<Arc<dyn TimestampProvider>>,
    recv_window: u64,
    user_agent: Option<String>,
    max_retries: u32,
    rate_limits: Option<Vec<RateLimitDescriptor>>,
}

impl SpotRestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: BINANCE_BASE_URL.to_string(),
            credentials: None,
            timestamp_provider: None,
            recv_window: 5000,
            user_agent: None,
            // The client never retries on its own; callers opt in.
            max_retries: 0,
            rate_limits: None,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the credentials provider for signed requests.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set a custom timestamp provider for signed requests.
    pub fn timestamp_provider(mut self, provider: Arc<dyn TimestampProvider>) -> Self {
        self.timestamp_provider = Some(provider);
        self
    }

    /// Set the `recvWindow` for signed requests, in milliseconds.
    pub fn recv_window(mut self, millis: u64) -> Self {
        self.recv_window = millis;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the maximum number of automatic retries for transient failures.
    ///
    /// Defaults to zero: connectivity errors surface to the caller, which
    /// owns the retry policy.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Provide rate limit rules directly instead of fetching them.
    ///
    /// [`connect`](Self::connect) skips the metadata call when rules are
    /// provided. Intended for tests and for callers that cache
    /// `exchangeInfo` themselves.
    pub fn rate_limits(mut self, descriptors: Vec<RateLimitDescriptor>) -> Self {
        self.rate_limits = Some(descriptors);
        self
    }

    /// Build the client and discover the exchange's rate limits.
    ///
    /// Performs the one-time `exchangeInfo` fetch (unless
    /// [`rate_limits`](Self::rate_limits) provided the rules) and composes the
    /// admission gates from the published rules. A network failure here fails
    /// client construction.
    pub async fn connect(self) -> Result<SpotRestClient, BinanceError> {
        let provided = self.rate_limits.clone();
        let mut client = self.build();

        let descriptors = match provided {
            Some(descriptors) => descriptors,
            None => {
                let info = client
                    .public_get::<crate::spot::rest::public::ExchangeInfo>(
                        public::EXCHANGE_INFO,
                        weights::EXCHANGE_INFO,
                    )
                    .await?;
                info.rate_limit_descriptors()
            }
        };

        tracing::debug!(rules = descriptors.len(), "composed local rate limit gates");
        client.admission = Arc::new(AdmissionController::from_descriptors(&descriptors));
        client.rate_limits = Arc::new(descriptors);
        Ok(client)
    }

    /// Build the client without contacting the exchange.
    ///
    /// No local gates are composed unless [`rate_limits`](Self::rate_limits)
    /// was called; prefer [`connect`](Self::connect) outside of tests.
    pub fn build(self) -> SpotRestClient {
        // Build default headers.
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("binance-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("binance-api-client"));
        headers.insert(USER_AGENT, header_value);

        // Build the HTTP client with middleware.
        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(self.max_retries);

        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let timestamp_provider = self
            .timestamp_provider
            .unwrap_or_else(|| Arc::new(SystemTimestamp::new()));

        let descriptors = self.rate_limits.unwrap_or_default();

        SpotRestClient {
            http_client: client,
            base_url: self.base_url,
            credentials: self.credentials,
            timestamp_provider,
            recv_window: self.recv_window,
            admission: Arc::new(AdmissionController::from_descriptors(&descriptors)),
            rate_limits: Arc::new(descriptors),
        }
    }
}

impl Default for SpotRestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
