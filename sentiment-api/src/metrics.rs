use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Succeeded,
    Failed { kind: String },
}

/// One finished backend call.
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub endpoint: String,
    pub method: String,
    pub status_code: Option<u16>,
    pub elapsed: Duration,
    pub outcome: CallOutcome,
}

impl CallRecord {
    pub fn succeeded(&self) -> bool {
        self.outcome == CallOutcome::Succeeded
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EndpointStats {
    pub calls: u64,
    pub failures: u64,
    pub total_elapsed: Duration,
    pub fastest: Option<Duration>,
    pub slowest: Option<Duration>,
    pub last_status: Option<u16>,
    pub last_failure: Option<String>,
}

impl EndpointStats {
    fn absorb(&mut self, record: &CallRecord) {
        self.calls += 1;
        self.total_elapsed += record.elapsed;
        self.fastest = Some(self.fastest.map_or(record.elapsed, |d| d.min(record.elapsed)));
        self.slowest = Some(self.slowest.map_or(record.elapsed, |d| d.max(record.elapsed)));
        if record.status_code.is_some() {
            self.last_status = record.status_code;
        }
        if let CallOutcome::Failed { kind } = &record.outcome {
            self.failures += 1;
            self.last_failure = Some(kind.clone());
        }
    }

    pub fn successes(&self) -> u64 {
        self.calls - self.failures
    }

    pub fn mean_elapsed(&self) -> Option<Duration> {
        u32::try_from(self.calls)
            .ok()
            .filter(|&calls| calls > 0)
            .map(|calls| self.total_elapsed / calls)
    }

    pub fn success_rate(&self) -> Option<f64> {
        (self.calls > 0).then(|| self.successes() as f64 / self.calls as f64)
    }
}

/// Client-side view of how the backend has been answering.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientMetrics {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub last_request_at: Option<SystemTime>,
    pub endpoints: BTreeMap<String, EndpointStats>,
}

impl ClientMetrics {
    pub fn endpoint(&self, name: &str) -> Option<&EndpointStats> {
        self.endpoints.get(name)
    }

    pub fn mean_elapsed(&self) -> Option<Duration> {
        let total: Duration = self.endpoints.values().map(|s| s.total_elapsed).sum();
        u32::try_from(self.total_requests)
            .ok()
            .filter(|&calls| calls > 0)
            .map(|calls| total / calls)
    }
}

#[derive(Debug, Default)]
pub struct MetricsRecorder {
    inner: RwLock<ClientMetrics>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, record: CallRecord) {
        let mut metrics = self.inner.write().await;
        metrics.total_requests += 1;
        metrics.last_request_at = Some(SystemTime::now());
        if record.succeeded() {
            metrics.successful_requests += 1;
        } else {
            metrics.failed_requests += 1;
        }
        metrics
            .endpoints
            .entry(record.endpoint.clone())
            .or_default()
            .absorb(&record);
    }

    pub async fn snapshot(&self) -> ClientMetrics {
        self.inner.read().await.clone()
    }

    pub async fn endpoint(&self, name: &str) -> Option<EndpointStats> {
        self.inner.read().await.endpoint(name).cloned()
    }

    pub async fn reset(&self) {
        *self.inner.write().await = ClientMetrics::default();
    }

    pub async fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.snapshot().await)
    }
}
