#[cfg(test)]
mod tests {
    use crate::{api, retry, SentimentApiClient};
    use sentiview_core::{
        AppConfig, CoreError, DataQuery, ErrorExt, GroupMap, PostRecord, RetrySettings,
        SentimentLabel, Timeframe,
    };
    use std::time::Duration;

    // Port 9 (discard) is closed on loopback, so connections are refused fast.
    fn unreachable_client() -> SentimentApiClient {
        let mut config = AppConfig::default();
        config.api.base_url = "http://127.0.0.1:9/api".to_string();
        config.api.timeout_secs = 2;
        SentimentApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_client_creation_from_config() {
        let client = SentimentApiClient::new(&AppConfig::default()).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:5000/api/");
    }

    #[test]
    fn test_data_payload_decoding() {
        let payload = r#"[
            {"id": "a1", "item_type": "post", "subreddit": "python", "author": "x",
             "content": "Loving the new release", "url": "https://www.reddit.com/r/python/a1",
             "created_utc": "2024-03-01T14:25:00", "sentiment_label": "positive",
             "sentiment_score": 0.8, "score": 120, "num_comments": 4},
            {"id": "a2", "subreddit": "news", "created_utc": "2024-03-01T15:01:00",
             "sentiment_label": null, "sentiment_score": null, "score": -3}
        ]"#;

        let posts: Vec<PostRecord> = serde_json::from_str(payload).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].label(), Some(SentimentLabel::Positive));
        assert_eq!(posts[0].engagement_score, 120);
        assert_eq!(posts[1].label(), None);
        assert_eq!(posts[1].sentiment_score, 0.0);
        assert_eq!(posts[1].engagement_score, -3);
    }

    #[test]
    fn test_groups_payload_decoding() {
        let payload = r#"{"tech": ["python", "rust"], "world": ["news", "worldnews"]}"#;
        let groups: GroupMap = serde_json::from_str(payload).unwrap();
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["tech", "world"]);
        assert_eq!(groups["tech"], vec!["python", "rust"]);
    }

    #[test]
    fn test_error_body_message_extraction() {
        assert_eq!(
            api::error_message_from_body(r#"{"status":"error","message":"boom"}"#).as_deref(),
            Some("boom")
        );
        assert_eq!(api::error_message_from_body(r#"{"message":"  "}"#), None);
        assert_eq!(api::error_message_from_body("Internal Server Error"), None);
    }

    #[tokio::test]
    async fn test_startup_join_fails_as_a_unit() {
        let client = unreachable_client();
        let query = DataQuery::for_subreddit("python", Timeframe::Last24Hours);

        let result = client.load_dashboard(&query).await;
        let error = result.unwrap_err();
        assert!(matches!(error, CoreError::Network(_) | CoreError::Api(_)));
        assert!(error.is_retryable());

        let api_metrics = client.metrics().await;
        assert!(api_metrics.failed_requests >= 1);
        assert_eq!(api_metrics.successful_requests, 0);
    }

    #[test]
    fn test_ingestion_trigger_against_unreachable_backend() {
        let client = unreachable_client();
        let result = tokio_test::block_on(client.fetch_random());
        assert!(result.is_err());

        let metrics = tokio_test::block_on(client.metrics());
        let random = metrics.endpoint("fetch/random").unwrap();
        assert_eq!(random.failures, 1);
        assert_eq!(random.last_status, None);
    }

    #[tokio::test]
    async fn test_health_check_against_unreachable_backend() {
        let client = unreachable_client();
        let error = client.health().await.unwrap_err();
        assert!(error.is_retryable());

        let status = client.metrics().await.endpoint("status").cloned().unwrap();
        assert!(status.failures >= 1);
        assert_eq!(status.successes(), 0);
    }

    #[test]
    fn test_retry_policy_from_config() {
        let settings = RetrySettings {
            max_attempts: 4,
            base_delay_ms: 250,
            max_delay_ms: 2_000,
            jitter_factor: 0.0,
        };
        let policy = retry::RetryPolicy::from_settings(&settings);
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(retry::calculate_delay(1, &policy), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_reset_metrics_clears_failures() {
        let client = unreachable_client();
        let _ = client.get_groups().await;
        assert_eq!(client.metrics().await.failed_requests, 1);

        client.reset_metrics().await;
        let metrics = client.metrics().await;
        assert_eq!(metrics.total_requests, 0);
        assert!(metrics.endpoints.is_empty());
    }
}
