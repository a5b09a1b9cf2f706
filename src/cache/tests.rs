#[cfg(test)]
mod tests {
    use futures::future::{pending, BoxFuture, FutureExt};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::{sleep, timeout, Duration};

    use crate::api::{ApiRequest, ArticleFilter, FetchError, Resource};
    use crate::cache::{QueryCache, QueryKey, QueryObserver, QueryState};

    fn articles_key(page: u32) -> QueryKey {
        QueryKey::from(&ApiRequest::articles(page, 20, &ArticleFilter::default()))
    }

    fn cache() -> Arc<QueryCache> {
        Arc::new(QueryCache::new(None, Duration::from_secs(300)))
    }

    /// Fetcher that counts its invocations and answers `value` after `delay`.
    fn counting_fetcher(
        calls: &Arc<AtomicUsize>,
        value: Value,
        delay: Duration,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<Value, FetchError>> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                sleep(delay).await;
                Ok(value)
            }
            .boxed()
        }
    }

    fn failing_fetcher(
        calls: &Arc<AtomicUsize>,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<Value, FetchError>> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                Err(FetchError::Status {
                    resource: Resource::Articles,
                    status: 503,
                })
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_request() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = articles_key(1);

        let (first, second) = tokio::join!(
            cache.fetch(&key, counting_fetcher(&calls, json!({"n": 1}), Duration::from_millis(20))),
            cache.fetch(&key, counting_fetcher(&calls, json!({"n": 2}), Duration::from_millis(20))),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let first = first.unwrap();
        let second = second.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, json!({"n": 1}));
        assert_eq!(cache.network_calls(), 1);
    }

    #[tokio::test]
    async fn test_cached_payload_is_reused() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = articles_key(1);

        cache
            .fetch(&key, counting_fetcher(&calls, json!(1), Duration::ZERO))
            .await
            .unwrap();
        let again = cache
            .fetch(&key, counting_fetcher(&calls, json!(2), Duration::ZERO))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*again, json!(1));
    }

    #[tokio::test]
    async fn test_different_params_are_different_entries() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .fetch(&articles_key(1), counting_fetcher(&calls, json!(1), Duration::ZERO))
            .await
            .unwrap();
        cache
            .fetch(&articles_key(2), counting_fetcher(&calls, json!(2), Duration::ZERO))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_refetch_ignores_fresh_data() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::from(&ApiRequest::clusters(8));

        cache
            .fetch(&key, counting_fetcher(&calls, json!(1), Duration::ZERO))
            .await
            .unwrap();
        let refreshed = cache
            .refetch(&key, counting_fetcher(&calls, json!(2), Duration::ZERO))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*refreshed, json!(2));
        assert_eq!(cache.peek(&key).as_deref(), Some(&json!(2)));
    }

    #[tokio::test]
    async fn test_invalidate_forces_next_fetch() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::from(&ApiRequest::stats());

        assert!(!cache.invalidate(&key));
        cache
            .fetch(&key, counting_fetcher(&calls, json!(1), Duration::ZERO))
            .await
            .unwrap();
        assert!(cache.invalidate(&key));
        // Stale data stays readable until replaced
        assert_eq!(cache.peek(&key).as_deref(), Some(&json!(1)));

        let value = cache
            .fetch(&key, counting_fetcher(&calls, json!(2), Duration::ZERO))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*value, json!(2));
    }

    #[tokio::test]
    async fn test_invalidate_resource() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        for page in 1..=3 {
            cache
                .fetch(&articles_key(page), counting_fetcher(&calls, json!(page), Duration::ZERO))
                .await
                .unwrap();
        }
        cache
            .fetch(
                &QueryKey::from(&ApiRequest::stats()),
                counting_fetcher(&calls, json!("stats"), Duration::ZERO),
            )
            .await
            .unwrap();

        assert_eq!(cache.invalidate_resource(Resource::Articles), 3);
    }

    #[tokio::test]
    async fn test_stale_time_expires_entries() {
        let cache = QueryCache::new(Some(Duration::from_millis(20)), Duration::from_secs(300));
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::from(&ApiRequest::sentiment());

        cache
            .fetch(&key, counting_fetcher(&calls, json!(1), Duration::ZERO))
            .await
            .unwrap();
        cache
            .fetch(&key, counting_fetcher(&calls, json!(2), Duration::ZERO))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        sleep(Duration::from_millis(40)).await;
        let value = cache
            .fetch(&key, counting_fetcher(&calls, json!(3), Duration::ZERO))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*value, json!(3));
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_payload_and_retries() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::from(&ApiRequest::problems());

        cache
            .fetch(&key, counting_fetcher(&calls, json!("good"), Duration::ZERO))
            .await
            .unwrap();
        let err = cache.refetch(&key, failing_fetcher(&calls)).await.unwrap_err();
        assert_eq!(
            err,
            FetchError::Status {
                resource: Resource::Articles,
                status: 503
            }
        );
        assert_eq!(cache.peek(&key).as_deref(), Some(&json!("good")));
        assert!(!cache.is_fetching(&key));

        // A failure on an empty entry is not cached either
        let empty = articles_key(9);
        assert!(cache.fetch(&empty, failing_fetcher(&calls)).await.is_err());
        assert!(cache.fetch(&empty, failing_fetcher(&calls)).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_cleared_cache_discards_pending_result() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = articles_key(1);

        let fetch = cache.fetch(&key, counting_fetcher(&calls, json!(1), Duration::from_millis(20)));
        let (result, ()) = tokio::join!(fetch, async {
            sleep(Duration::from_millis(5)).await;
            cache.clear();
        });

        // The caller still gets its answer; the cleared cache does not
        assert_eq!(*result.unwrap(), json!(1));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_garbage_collection_spares_observed_entries() {
        let cache = Arc::new(QueryCache::new(None, Duration::ZERO));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut observer = QueryObserver::new(Arc::clone(&cache));
        observer
            .observe(articles_key(1), counting_fetcher(&calls, json!(1), Duration::ZERO))
            .await;
        cache
            .fetch(&articles_key(2), counting_fetcher(&calls, json!(2), Duration::ZERO))
            .await
            .unwrap();

        assert_eq!(cache.collect_garbage(), 1);
        assert!(cache.peek(&articles_key(1)).is_some());

        drop(observer);
        assert_eq!(cache.collect_garbage(), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_recently_released_entries_survive_gc() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        cache
            .fetch(&articles_key(1), counting_fetcher(&calls, json!(1), Duration::ZERO))
            .await
            .unwrap();

        assert_eq!(cache.collect_garbage(), 0);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_abandoned_request_is_collected() {
        let cache = Arc::new(QueryCache::new(None, Duration::ZERO));
        let calls = Arc::new(AtomicUsize::new(0));
        let key = articles_key(1);

        // Every caller gives up, so the request is never polled again
        let abandoned = timeout(
            Duration::from_millis(10),
            cache.fetch(&key, || pending::<Result<Value, FetchError>>()),
        )
        .await;
        assert!(abandoned.is_err());
        assert!(cache.is_fetching(&key));

        assert_eq!(cache.collect_garbage(), 1);
        assert!(!cache.is_fetching(&key));
        assert!(cache.is_empty());

        let value = cache
            .fetch(&key, counting_fetcher(&calls, json!(1), Duration::ZERO))
            .await
            .unwrap();
        assert_eq!(*value, json!(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_young_abandoned_request_survives_gc() {
        let cache = cache();
        let key = articles_key(1);

        let abandoned = timeout(
            Duration::from_millis(10),
            cache.fetch(&key, || pending::<Result<Value, FetchError>>()),
        )
        .await;
        assert!(abandoned.is_err());

        assert_eq!(cache.collect_garbage(), 0);
        assert!(cache.is_fetching(&key));
    }

    #[tokio::test]
    async fn test_observer_lifecycle() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut observer = QueryObserver::new(Arc::clone(&cache));
        assert!(observer.state().is_idle());

        let ticket = observer.begin(articles_key(1));
        assert_eq!(observer.state(), &QueryState::Loading { previous: None });
        let result = cache
            .fetch(ticket.key(), counting_fetcher(&calls, json!("page 1"), Duration::ZERO))
            .await;
        assert!(observer.complete(ticket, result));
        assert_eq!(observer.state().data().map(|v| &**v), Some(&json!("page 1")));

        // Moving to an uncached key keeps the old page visible while loading
        let ticket = observer.begin(articles_key(2));
        assert!(observer.state().is_loading());
        assert_eq!(observer.state().data().map(|v| &**v), Some(&json!("page 1")));

        let result = cache.fetch(ticket.key(), failing_fetcher(&calls)).await;
        assert!(observer.complete(ticket, result));
        assert!(observer.state().error().is_some());
        assert_eq!(observer.state().data(), None);
    }

    #[tokio::test]
    async fn test_switching_back_shows_cached_data() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut observer = QueryObserver::new(Arc::clone(&cache));

        observer
            .observe(articles_key(1), counting_fetcher(&calls, json!(1), Duration::ZERO))
            .await;
        observer
            .observe(articles_key(2), counting_fetcher(&calls, json!(2), Duration::ZERO))
            .await;

        observer.begin(articles_key(1));
        assert_eq!(observer.state().data().map(|v| &**v), Some(&json!(1)));

        let state = observer
            .observe(articles_key(1), counting_fetcher(&calls, json!(3), Duration::ZERO))
            .await;
        assert_eq!(state.data().map(|v| &**v), Some(&json!(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_late_response_is_discarded() {
        let cache = cache();
        let mut observer = QueryObserver::new(Arc::clone(&cache));

        let stale = observer.begin(articles_key(1));
        let current = observer.begin(articles_key(2));

        assert!(!observer.complete(stale, Ok(Arc::new(json!("old")))));
        assert!(observer.state().is_loading());

        assert!(observer.complete(current, Ok(Arc::new(json!("new")))));
        assert_eq!(observer.state().data().map(|v| &**v), Some(&json!("new")));
    }

    #[tokio::test]
    async fn test_superseded_request_for_same_key_is_discarded() {
        let cache = cache();
        let mut observer = QueryObserver::new(Arc::clone(&cache));

        let first = observer.begin(articles_key(1));
        let second = observer.begin(articles_key(1));

        assert!(!observer.complete(first, Ok(Arc::new(json!(1)))));
        assert!(observer.complete(second, Ok(Arc::new(json!(2)))));
    }

    #[tokio::test]
    async fn test_disabled_observer_is_idle() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut observer = QueryObserver::new(Arc::clone(&cache));

        let key = QueryKey::from(&ApiRequest::search("tax", None));
        let ticket = observer.begin(key.clone());
        observer.disable();

        assert!(observer.state().is_idle());
        assert_eq!(observer.key(), None);
        assert!(!observer.complete(ticket, Ok(Arc::new(json!([])))));

        // Refetch without a key is a no-op
        let state = observer
            .refetch(counting_fetcher(&calls, json!(1), Duration::ZERO))
            .await;
        assert!(state.is_idle());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_observer_refetch_goes_to_network() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut observer = QueryObserver::new(Arc::clone(&cache));

        observer
            .observe(
                QueryKey::from(&ApiRequest::clusters(6)),
                counting_fetcher(&calls, json!(1), Duration::ZERO),
            )
            .await;
        let state = observer
            .refetch(counting_fetcher(&calls, json!(2), Duration::ZERO))
            .await;

        assert_eq!(state.data().map(|v| &**v), Some(&json!(2)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
