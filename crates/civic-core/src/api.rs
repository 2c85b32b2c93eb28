use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::config::Config;
use crate::error::{ApiError, ApiResult, json_kind};
use crate::model::{
    Analytics, ChartData, Department, Issue, IssueStats, IssueStatus, Officer, OfficerDraft,
    StatusPatch, User,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Every endpoint the console reads or mutates.
#[async_trait]
pub trait CivicApi: Send + Sync {
    async fn list_issues(&self) -> ApiResult<Vec<Issue>>;
    async fn get_issue(&self, id: u64) -> ApiResult<Issue>;
    async fn update_issue_status(&self, id: u64, status: IssueStatus) -> ApiResult<()>;
    async fn issue_stats(&self) -> ApiResult<IssueStats>;
    async fn issue_analytics(&self) -> ApiResult<Analytics>;
    async fn issue_chart_data(&self) -> ApiResult<ChartData>;
    async fn list_users(&self) -> ApiResult<Vec<User>>;
    async fn list_officers(&self) -> ApiResult<Vec<Officer>>;
    async fn list_departments(&self) -> ApiResult<Vec<Department>>;
    async fn create_officer(&self, draft: &OfficerDraft) -> ApiResult<()>;
}

/// One REST route the console talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Issues,
    Issue(u64),
    IssueStatus(u64),
    IssueStats,
    IssueAnalytics,
    IssueChartData,
    Users,
    Officers,
    Departments,
    CreateOfficer,
}

impl Endpoint {
    pub fn method(self) -> Method {
        match self {
            Endpoint::IssueStatus(_) => Method::PATCH,
            Endpoint::CreateOfficer => Method::POST,
            _ => Method::GET,
        }
    }

    pub fn path(self) -> String {
        match self {
            Endpoint::Issues => "/issues".to_string(),
            Endpoint::Issue(id) => format!("/issues/{id}"),
            Endpoint::IssueStatus(id) => format!("/issues/{id}/status"),
            Endpoint::IssueStats => "/issues/stats".to_string(),
            Endpoint::IssueAnalytics => "/issues/analytics".to_string(),
            Endpoint::IssueChartData => "/issues/chart-data".to_string(),
            Endpoint::Users => "/users".to_string(),
            Endpoint::Officers => "/users/officers".to_string(),
            Endpoint::Departments => "/users/departments".to_string(),
            Endpoint::CreateOfficer => "/users/officer".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> ApiResult<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: trimmed.to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let base_url = cfg
            .get("api.base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = match cfg.get("api.timeout") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("invalid api.timeout: {raw}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let api = Self::new(&base_url, cfg.get("api.token"), Duration::from_secs(timeout))?;
        debug!(base_url = %api.base_url, timeout, authenticated = api.token.is_some(), "built http api client");
        Ok(api)
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    fn request(&self, endpoint: Endpoint) -> RequestBuilder {
        let mut req = self.client.request(endpoint.method(), self.url(endpoint));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    #[instrument(skip(self, req))]
    async fn send(&self, req: RequestBuilder, endpoint: Endpoint) -> ApiResult<String> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;
        trace!(status = status.as_u16(), bytes = body.len(), "response received");

        if !status.is_success() {
            return Err(ApiError::server(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn get_value(&self, endpoint: Endpoint) -> ApiResult<Value> {
        let body = self.send(self.request(endpoint), endpoint).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_list<T: DeserializeOwned>(&self, endpoint: Endpoint) -> ApiResult<Vec<T>> {
        let value = self.get_value(endpoint).await?;
        decode_list(&endpoint.path(), value)
    }

    async fn get_object<T: DeserializeOwned>(&self, endpoint: Endpoint) -> ApiResult<T> {
        let value = self.get_value(endpoint).await?;
        decode_object(&endpoint.path(), value)
    }

    async fn send_json<B: Serialize + Sync>(&self, endpoint: Endpoint, body: &B) -> ApiResult<()> {
        let req = self.request(endpoint).json(body);
        self.send(req, endpoint).await?;
        Ok(())
    }
}

/// Accepts only a JSON array; each element must decode as `T`.
pub fn decode_list<T: DeserializeOwned>(endpoint: &str, value: Value) -> ApiResult<Vec<T>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(ApiError::from))
            .collect(),
        other => Err(ApiError::UnexpectedShape {
            endpoint: endpoint.to_string(),
            expected: "array",
            found: json_kind(&other),
        }),
    }
}

pub fn decode_object<T: DeserializeOwned>(endpoint: &str, value: Value) -> ApiResult<T> {
    match value {
        Value::Object(_) => Ok(serde_json::from_value(value)?),
        other => Err(ApiError::UnexpectedShape {
            endpoint: endpoint.to_string(),
            expected: "object",
            found: json_kind(&other),
        }),
    }
}

#[async_trait]
impl CivicApi for HttpApi {
    async fn list_issues(&self) -> ApiResult<Vec<Issue>> {
        self.get_list(Endpoint::Issues).await
    }

    async fn get_issue(&self, id: u64) -> ApiResult<Issue> {
        self.get_object(Endpoint::Issue(id)).await
    }

    async fn update_issue_status(&self, id: u64, status: IssueStatus) -> ApiResult<()> {
        self.send_json(Endpoint::IssueStatus(id), &StatusPatch { status })
            .await
    }

    async fn issue_stats(&self) -> ApiResult<IssueStats> {
        self.get_object(Endpoint::IssueStats).await
    }

    async fn issue_analytics(&self) -> ApiResult<Analytics> {
        self.get_object(Endpoint::IssueAnalytics).await
    }

    async fn issue_chart_data(&self) -> ApiResult<ChartData> {
        self.get_object(Endpoint::IssueChartData).await
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.get_list(Endpoint::Users).await
    }

    async fn list_officers(&self) -> ApiResult<Vec<Officer>> {
        self.get_list(Endpoint::Officers).await
    }

    async fn list_departments(&self) -> ApiResult<Vec<Department>> {
        self.get_list(Endpoint::Departments).await
    }

    async fn create_officer(&self, draft: &OfficerDraft) -> ApiResult<()> {
        self.send_json(Endpoint::CreateOfficer, draft).await
    }
}
