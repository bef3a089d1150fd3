#[cfg(test)]
mod tests {
    use crate::types::{CheckRequest, CheckResponse, StatsResponse};

    #[tokio::test]
    async fn test_check_request_serialization() {
        let request = CheckRequest {
            key: "session:123".to_string(),
            timestamp_ms: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("session:123"));

        let response_json = r#"{
            "allowed": true,
            "remaining": 19,
            "reset_at_ms": 1234567890123,
            "retry_after_secs": 0
        }"#;

        let response: CheckResponse = serde_json::from_str(response_json).unwrap();
        assert!(response.allowed);
        assert_eq!(response.remaining, 19);
        assert_eq!(response.reset_at_ms, 1_234_567_890_123);
    }

    #[tokio::test]
    async fn test_timestamp_defaults_to_absent() {
        let request_json = r#"{"key": "session:123"}"#;

        let request: CheckRequest = serde_json::from_str(request_json).unwrap();
        assert_eq!(request.key, "session:123");
        assert_eq!(request.timestamp_ms, None);
    }

    #[tokio::test]
    async fn test_explicit_timestamp_is_parsed() {
        let request_json = r#"{"key": "session:123", "timestamp_ms": 1234567890123}"#;

        let request: CheckRequest = serde_json::from_str(request_json).unwrap();
        assert_eq!(request.timestamp_ms, Some(1_234_567_890_123));
    }

    #[tokio::test]
    async fn test_stats_response_round_trip() {
        let stats_json = r#"{
            "count": 7,
            "window_start_ms": 1234567890000,
            "last_request_ms": 1234567895000
        }"#;

        let stats: StatsResponse = serde_json::from_str(stats_json).unwrap();
        assert_eq!(stats.count, 7);
        assert!(stats.window_start_ms <= stats.last_request_ms);
    }
}
