use std::time::Duration;

use browser_core::{Company, CompanyPage, CompanyQuery, FilterOptions, SelectionAck, SelectionRequest};
use browser_logging::browser_debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::{ApiError, FailureKind, HealthStatus};

pub const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Root of the versioned API, e.g. `http://localhost:8000/api/v1`.
    pub base_url: String,
    pub api_key: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v1".to_string(),
            api_key: "dev-api-key-12345".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The company endpoints of the backend. Injected into the engine so tests
/// can substitute a scripted implementation.
#[async_trait::async_trait]
pub trait CompanyApi: Send + Sync {
    async fn list_companies(&self, query: &CompanyQuery) -> Result<CompanyPage, ApiError>;

    async fn filter_options(&self) -> Result<FilterOptions, ApiError>;

    async fn select_company(
        &self,
        company_id: &str,
        request: &SelectionRequest,
    ) -> Result<SelectionAck, ApiError>;

    async fn get_company(&self, company_id: &str) -> Result<Company, ApiError>;

    async fn selected_companies(&self) -> Result<Vec<Company>, ApiError>;

    async fn health(&self) -> Result<HealthStatus, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestCompanyApi {
    base_url: Url,
    health_url: Url,
    http: reqwest::Client,
}

impl ReqwestCompanyApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }
        // The health check lives at the server root, outside the versioned API.
        let health_url = base_url
            .join("/health")
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let mut api_key = HeaderValue::from_str(&settings.api_key)
            .map_err(|err| ApiError::new(FailureKind::InvalidSettings, err.to_string()))?;
        api_key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            base_url,
            health_url,
            http,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ApiError::new(FailureKind::InvalidUrl, "base url cannot have path segments")
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(
                ApiError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
                    .with_detail(extract_detail(&body)),
            );
        }

        serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl CompanyApi for ReqwestCompanyApi {
    async fn list_companies(&self, query: &CompanyQuery) -> Result<CompanyPage, ApiError> {
        let mut url = self.endpoint(&["companies"])?;
        url.query_pairs_mut().extend_pairs(query.query_pairs());
        browser_debug!("GET {}", url);
        self.execute(self.http.get(url)).await
    }

    async fn filter_options(&self) -> Result<FilterOptions, ApiError> {
        let url = self.endpoint(&["companies", "filters"])?;
        browser_debug!("GET {}", url);
        self.execute(self.http.get(url)).await
    }

    async fn select_company(
        &self,
        company_id: &str,
        request: &SelectionRequest,
    ) -> Result<SelectionAck, ApiError> {
        let url = self.endpoint(&["companies", company_id, "select"])?;
        let body = serde_json::to_vec(request)
            .map_err(|err| ApiError::new(FailureKind::Encode, err.to_string()))?;
        browser_debug!("POST {} selected={}", url, request.selected);
        self.execute(
            self.http
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(body),
        )
        .await
    }

    async fn get_company(&self, company_id: &str) -> Result<Company, ApiError> {
        let url = self.endpoint(&["companies", company_id])?;
        browser_debug!("GET {}", url);
        self.execute(self.http.get(url)).await
    }

    async fn selected_companies(&self) -> Result<Vec<Company>, ApiError> {
        let url = self.endpoint(&["companies", "selected"])?;
        browser_debug!("GET {}", url);
        self.execute(self.http.get(url)).await
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        browser_debug!("GET {}", self.health_url);
        self.execute(self.http.get(self.health_url.clone())).await
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Only a string `detail` is user-facing; validation errors send a list.
fn extract_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    let detail = parsed.detail?;
    detail
        .as_str()
        .map(str::trim)
        .filter(|detail| !detail.is_empty())
        .map(ToOwned::to_owned)
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
