pub mod api;
pub mod metrics;
pub mod retry;

#[cfg(test)]
mod tests;

pub use api::SentimentApiClient;
pub use metrics::{CallOutcome, CallRecord, ClientMetrics, EndpointStats, MetricsRecorder};
pub use retry::{calculate_delay, RetryPolicy};
