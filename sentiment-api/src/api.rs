use crate::metrics::{CallOutcome, CallRecord, ClientMetrics, MetricsRecorder};
use crate::retry::RetryPolicy;
use reqwest::{Client, Method, Response, StatusCode};
use sentiview_core::{
    ApiError, AppConfig, CoreError, DashboardSnapshot, DashboardStats, DataQuery, GroupMap,
    HealthStatus, IngestionResponse, PostRecord,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use url::Url;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug)]
pub struct SentimentApiClient {
    http_client: Client,
    base_url: Url,
    retry_policy: RetryPolicy,
    metrics: Arc<MetricsRecorder>,
    user_agent: String,
}

impl SentimentApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, CoreError> {
        let base_url = config.api_base_url()?;
        let user_agent = config.api.user_agent.clone();

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            retry_policy: RetryPolicy::from_settings(&config.retry),
            metrics: Arc::new(MetricsRecorder::new()),
            user_agent,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, CoreError> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| CoreError::InvalidInput {
                message: format!("invalid endpoint {}: {}", endpoint, e),
            })
    }

    pub async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Response, CoreError> {
        let url = self.endpoint_url(endpoint)?;
        let start_time = Instant::now();

        let mut request_builder = self
            .http_client
            .request(method.clone(), url)
            .header("User-Agent", &self.user_agent);

        if !query_params.is_empty() {
            request_builder = request_builder.query(query_params);
        }
        if let Some(body) = body {
            request_builder = request_builder.json(body);
        }

        info!("Making backend request: {} {}", method, endpoint);
        let (outcome, status_code, failure_kind) = match request_builder.send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Request successful: {} {}", response.status(), endpoint);
                let status = response.status().as_u16();
                (Ok(response), Some(status), None)
            }
            Ok(response) => {
                let status = response.status();
                error!("Request failed with status: {} for {}", status, endpoint);
                let body = response.text().await.unwrap_or_default();
                let api_error = classify_status(endpoint, status, &body);
                let failure_kind = api_error_type(&api_error);
                (
                    Err(CoreError::Api(api_error)),
                    Some(status.as_u16()),
                    Some(failure_kind),
                )
            }
            Err(e) => {
                error!("Network error for {} {}: {}", method, endpoint, e);
                if e.is_timeout() {
                    (
                        Err(CoreError::Api(ApiError::RequestTimeout)),
                        None,
                        Some("timeout".to_string()),
                    )
                } else {
                    (
                        Err(CoreError::Network(e)),
                        None,
                        Some("network_error".to_string()),
                    )
                }
            }
        };

        self.metrics
            .record(CallRecord {
                endpoint: endpoint.to_string(),
                method: method.to_string(),
                status_code,
                elapsed: start_time.elapsed(),
                outcome: match failure_kind {
                    Some(kind) => CallOutcome::Failed { kind },
                    None => CallOutcome::Succeeded,
                },
            })
            .await;

        outcome
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query_params: &[(&str, String)],
    ) -> Result<T, CoreError> {
        self.retry_policy
            .execute(endpoint, move || async move {
                let response = self
                    .make_request(Method::GET, endpoint, query_params, None)
                    .await?;
                decode_json(endpoint, response).await
            })
            .await
    }

    pub async fn health(&self) -> Result<HealthStatus, CoreError> {
        self.get_json("status", &[]).await
    }

    pub async fn get_data(&self, query: &DataQuery) -> Result<Vec<PostRecord>, CoreError> {
        let posts: Vec<PostRecord> = self.get_json("data", &query.to_query_pairs()).await?;
        info!("Retrieved {} posts", posts.len());
        Ok(posts)
    }

    pub async fn get_subreddits(&self) -> Result<Vec<String>, CoreError> {
        let subreddits: Vec<String> = self.get_json("subreddits", &[]).await?;
        debug!("Retrieved {} subreddit names", subreddits.len());
        Ok(subreddits)
    }

    pub async fn get_groups(&self) -> Result<GroupMap, CoreError> {
        let groups: GroupMap = self.get_json("groups", &[]).await?;
        debug!("Retrieved {} subreddit groups", groups.len());
        Ok(groups)
    }

    pub async fn get_stats(&self, query: &DataQuery) -> Result<DashboardStats, CoreError> {
        self.get_json("stats", &query.to_query_pairs()).await
    }

    /// The dashboard's startup join: posts, subreddit names and groups are
    /// fetched concurrently and any single failure fails the whole load.
    pub async fn load_dashboard(&self, query: &DataQuery) -> Result<DashboardSnapshot, CoreError> {
        let (posts, subreddits, groups) = futures::try_join!(
            self.get_data(query),
            self.get_subreddits(),
            self.get_groups()
        )?;

        Ok(DashboardSnapshot {
            posts,
            subreddits,
            groups,
        })
    }

    /// Asks the backend to ingest hot posts from one subreddit. Never retried.
    pub async fn fetch_subreddit(&self, subreddit: &str) -> Result<IngestionResponse, CoreError> {
        let subreddit = subreddit.trim();
        if subreddit.is_empty() {
            return Err(CoreError::InvalidInput {
                message: "subreddit name is empty".to_string(),
            });
        }

        let body = json!({ "subreddit": subreddit });
        self.trigger_ingestion("fetch/subreddit", Some(&body)).await
    }

    pub async fn fetch_random(&self) -> Result<IngestionResponse, CoreError> {
        self.trigger_ingestion("fetch/random", None).await
    }

    async fn trigger_ingestion(
        &self,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<IngestionResponse, CoreError> {
        let response = self
            .make_request(Method::POST, endpoint, &[], body)
            .await
            .map_err(into_ingestion_error)?;
        let result: IngestionResponse = decode_json(endpoint, response).await?;
        info!("Ingestion trigger {} answered: {}", endpoint, result.message);
        Ok(result)
    }

    pub async fn metrics(&self) -> ClientMetrics {
        self.metrics.snapshot().await
    }

    pub async fn reset_metrics(&self) {
        self.metrics.reset().await;
    }
}

async fn decode_json<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T, CoreError> {
    response.json::<T>().await.map_err(|e| {
        error!("Failed to parse response from {}: {}", endpoint, e);
        CoreError::Api(ApiError::InvalidResponse {
            details: format!("Failed to parse response from {}", endpoint),
        })
    })
}

/// Maps a non-success status to an `ApiError`, preferring the backend's own
/// `{"message": ...}` body when there is one.
pub fn classify_status(endpoint: &str, status: StatusCode, body: &str) -> ApiError {
    if let Some(message) = error_message_from_body(body) {
        return ApiError::Status {
            endpoint: endpoint.to_string(),
            status_code: status.as_u16(),
            message,
        };
    }

    if status == StatusCode::NOT_FOUND {
        ApiError::NotFound {
            endpoint: endpoint.to_string(),
        }
    } else if status.is_server_error() {
        ApiError::ServerError {
            status_code: status.as_u16(),
        }
    } else {
        ApiError::Status {
            endpoint: endpoint.to_string(),
            status_code: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
        }
    }
}

pub fn error_message_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

fn api_error_type(error: &ApiError) -> String {
    match error {
        ApiError::Status { .. } => "status",
        ApiError::ServerError { .. } => "server_error",
        ApiError::NotFound { .. } => "not_found",
        ApiError::InvalidResponse { .. } => "invalid_response",
        ApiError::RequestTimeout => "timeout",
        ApiError::IngestionFailed { .. } => "ingestion_failed",
    }
    .to_string()
}

/// Ingestion endpoints report failures as `{"status": "error", "message": ...}`.
fn into_ingestion_error(error: CoreError) -> CoreError {
    match error {
        CoreError::Api(ApiError::Status { message, .. }) => {
            CoreError::Api(ApiError::IngestionFailed { message })
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base_url: &str) -> SentimentApiClient {
        let mut config = AppConfig::default();
        config.api.base_url = base_url.to_string();
        SentimentApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_urls_keep_api_prefix() {
        let client = client_for("http://localhost:5000/api");
        assert_eq!(
            client.endpoint_url("data").unwrap().as_str(),
            "http://localhost:5000/api/data"
        );
        assert_eq!(
            client.endpoint_url("/fetch/subreddit").unwrap().as_str(),
            "http://localhost:5000/api/fetch/subreddit"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let mut config = AppConfig::default();
        config.api.base_url = "::nope::".to_string();
        assert!(matches!(
            SentimentApiClient::new(&config),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn test_classify_status_prefers_backend_message() {
        let error = classify_status(
            "fetch/subreddit",
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"status": "error", "message": "Failed to connect to Reddit API"}"#,
        );
        assert!(matches!(
            error,
            ApiError::Status { status_code: 500, ref message, .. }
                if message == "Failed to connect to Reddit API"
        ));
    }

    #[test]
    fn test_classify_status_without_body() {
        assert!(matches!(
            classify_status("groups", StatusCode::NOT_FOUND, ""),
            ApiError::NotFound { .. }
        ));
        assert!(matches!(
            classify_status("data", StatusCode::BAD_GATEWAY, "<html>"),
            ApiError::ServerError { status_code: 502 }
        ));
        assert!(matches!(
            classify_status("data", StatusCode::BAD_REQUEST, ""),
            ApiError::Status { status_code: 400, .. }
        ));
    }

    #[test]
    fn test_ingestion_errors_carry_backend_message() {
        let error = into_ingestion_error(CoreError::Api(ApiError::Status {
            endpoint: "fetch/subreddit".to_string(),
            status_code: 400,
            message: "Missing 'subreddit' in JSON body".to_string(),
        }));
        assert!(matches!(
            error,
            CoreError::Api(ApiError::IngestionFailed { ref message })
                if message == "Missing 'subreddit' in JSON body"
        ));

        let passthrough = into_ingestion_error(CoreError::Api(ApiError::RequestTimeout));
        assert!(matches!(passthrough, CoreError::Api(ApiError::RequestTimeout)));
    }

    #[tokio::test]
    async fn test_blank_subreddit_is_rejected_before_sending() {
        let client = client_for("http://localhost:5000/api");
        let result = client.fetch_subreddit("   ").await;
        assert!(matches!(result, Err(CoreError::InvalidInput { .. })));
        assert_eq!(client.metrics().await.total_requests, 0);
    }
}
