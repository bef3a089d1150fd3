#[cfg(test)]
mod tests {
    use crate::actor::LimiterActor;
    use std::time::{Duration, SystemTime};
    use turnstile::{MemoryStore, RateLimiter, RateLimiterBuilder};

    #[tokio::test]
    async fn test_basic_check() {
        let handle = LimiterActor::spawn(100, RateLimiter::new(MemoryStore::new()));

        let decision = handle
            .check("test".to_string(), SystemTime::now())
            .await
            .unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 19);
    }

    #[tokio::test]
    async fn test_concurrent_checks_admit_exactly_max() {
        let limiter = RateLimiterBuilder::new()
            .window(Duration::from_secs(60))
            .max_requests(10)
            .build(MemoryStore::new())
            .unwrap();
        let handle = LimiterActor::spawn(100, limiter);

        let now = SystemTime::now();

        // 40 concurrent checks for the same key from independent tasks
        let mut tasks = vec![];
        for _ in 0..40 {
            let h = handle.clone();
            tasks.push(tokio::spawn(async move {
                h.check("concurrent".to_string(), now).await
            }));
        }

        let mut allowed_count = 0;
        let mut denied_count = 0;
        for task in tasks {
            let decision = task.await.unwrap().unwrap();
            if decision.allowed {
                allowed_count += 1;
            } else {
                denied_count += 1;
            }
        }

        // Never more (or fewer) admissions than the window allows
        assert_eq!(allowed_count, 10);
        assert_eq!(denied_count, 30);
    }

    #[tokio::test]
    async fn test_stats_and_cleanup_through_the_actor() {
        let handle = LimiterActor::spawn(100, RateLimiter::new(MemoryStore::new()));

        // An ancient record and a current one
        let ancient = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        handle.check("old".to_string(), ancient).await.unwrap();
        let now = SystemTime::now();
        handle.check("new".to_string(), now).await.unwrap();

        let record = handle.stats("old".to_string()).await.unwrap().unwrap();
        assert_eq!(record.count, 1);

        assert_eq!(handle.cleanup(now).await.unwrap(), 1);
        assert!(handle.stats("old".to_string()).await.unwrap().is_none());
        assert!(handle.stats("new".to_string()).await.unwrap().is_some());

        // Nothing stale remains
        assert_eq!(handle.cleanup(now).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_evict_cache_without_cache_tier_is_a_noop() {
        let handle = LimiterActor::spawn(100, RateLimiter::new(MemoryStore::new()));

        handle.check("key".to_string(), SystemTime::now()).await.unwrap();
        assert_eq!(handle.evict_cache(SystemTime::now()).await.unwrap(), 0);
    }
}
