//! Bounded fan-out of resolutions over a worker pool.
//!
//! The pool bounds the number of concurrently in-flight lookups to a
//! configured limit, regardless of how many queries are pending, and yields
//! outcomes as they complete. Dispatch is pull-based: a worker task is
//! spawned for the next pending query only when a slot frees up, so no
//! query is ever dispatched twice and nothing runs ahead of the consumer
//! by more than the limit.

use std::time::{Duration, Instant};

use futures::stream::{self, Stream, StreamExt};
use tracing::debug;

use crate::error::ScanError;
use crate::resolver::Resolve;
use crate::types::ResolutionOutcome;

/// A fixed-size pool of resolution workers.
///
/// Stateless between runs: each [`TaskPool::run`] call processes a fresh
/// query set.
#[derive(Debug, Clone)]
pub struct TaskPool {
    concurrency: usize,
}

impl TaskPool {
    /// Create a pool with the given concurrency limit.
    ///
    /// Fails with [`ScanError::Config`] when the limit is zero, before any
    /// query is processed.
    pub fn new(concurrency: usize) -> Result<Self, ScanError> {
        if concurrency == 0 {
            return Err(ScanError::config(
                "worker pool requires a concurrency limit of at least 1",
            ));
        }
        Ok(Self { concurrency })
    }

    /// Resolve every query, yielding outcomes in completion order.
    ///
    /// Produces exactly one [`ResolutionOutcome`] per input query: a
    /// failing lookup becomes a `Failed` outcome for that query only and
    /// never affects the rest of the pool. An empty query set yields an
    /// immediately empty stream with zero workers spawned. When the limit
    /// exceeds the number of queries, effective concurrency is the number
    /// of queries.
    ///
    /// The stream is lazy: dropping it abandons pending queries, while
    /// already-spawned lookups finish naturally and their results are
    /// discarded.
    pub fn run<R: Resolve>(
        &self,
        resolver: R,
        queries: Vec<String>,
    ) -> impl Stream<Item = ResolutionOutcome> + Send {
        debug!(
            queries = queries.len(),
            concurrency = self.concurrency,
            "starting resolution pool"
        );

        let concurrency = self.concurrency;
        stream::iter(queries)
            .map(move |query| {
                let resolver = resolver.clone();
                // Runs when a slot frees: at most `concurrency` workers
                // are in flight at any moment.
                let worker = tokio::spawn(resolve_one(resolver, query.clone()));
                async move {
                    match worker.await {
                        Ok(outcome) => outcome,
                        // A panicked worker still yields its outcome, so the
                        // one-outcome-per-query invariant holds.
                        Err(e) => ResolutionOutcome::failed(
                            query,
                            ScanError::internal(format!("resolution worker failed: {}", e)),
                            Duration::ZERO,
                        ),
                    }
                }
            })
            .buffer_unordered(concurrency)
    }
}

/// Run a single lookup and package the result, whichever way it went.
async fn resolve_one<R: Resolve>(resolver: R, query: String) -> ResolutionOutcome {
    let started = Instant::now();
    match resolver.resolve(&query).await {
        Ok(addresses) => ResolutionOutcome::resolved(query, addresses, started.elapsed()),
        Err(error) => ResolutionOutcome::failed(query, error, started.elapsed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LookupResult;
    use std::collections::HashMap;
    use std::net::IpAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Stub resolver that tracks how many lookups are in flight at once.
    #[derive(Clone)]
    struct CountingResolver {
        in_flight: Arc<AtomicUsize>,
        max_seen: Arc<AtomicUsize>,
        delay: Duration,
    }

    impl CountingResolver {
        fn new(delay: Duration) -> Self {
            Self {
                in_flight: Arc::new(AtomicUsize::new(0)),
                max_seen: Arc::new(AtomicUsize::new(0)),
                delay,
            }
        }

        fn max_concurrent(&self) -> usize {
            self.max_seen.load(Ordering::SeqCst)
        }
    }

    impl Resolve for CountingResolver {
        async fn resolve(&self, _query: &str) -> Result<Vec<IpAddr>, ScanError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_seen.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(vec![])
        }
    }

    /// Stub resolver with scripted per-query answers.
    #[derive(Clone)]
    struct ScriptedResolver {
        answers: Arc<HashMap<String, Result<Vec<IpAddr>, String>>>,
    }

    impl ScriptedResolver {
        fn new(answers: HashMap<String, Result<Vec<IpAddr>, String>>) -> Self {
            Self {
                answers: Arc::new(answers),
            }
        }
    }

    impl Resolve for ScriptedResolver {
        async fn resolve(&self, query: &str) -> Result<Vec<IpAddr>, ScanError> {
            match self.answers.get(query) {
                Some(Ok(addrs)) => Ok(addrs.clone()),
                Some(Err(msg)) => Err(ScanError::lookup(query, msg.clone())),
                None => Ok(vec![]),
            }
        }
    }

    fn queries(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let err = TaskPool::new(0).unwrap_err();
        assert!(matches!(err, ScanError::Config { .. }));
        assert!(TaskPool::new(1).is_ok());
    }

    #[tokio::test]
    async fn test_empty_query_set_yields_empty_stream() {
        let pool = TaskPool::new(4).unwrap();
        let resolver = CountingResolver::new(Duration::ZERO);
        let outcomes: Vec<_> = pool.run(resolver.clone(), vec![]).collect().await;
        assert!(outcomes.is_empty());
        assert_eq!(resolver.max_concurrent(), 0);
    }

    #[tokio::test]
    async fn test_one_outcome_per_query_with_duplicates() {
        let pool = TaskPool::new(3).unwrap();
        let resolver = CountingResolver::new(Duration::from_millis(5));
        let input = queries(&["a.example.com", "a.example.com", "b.example.com"]);
        let outcomes: Vec<_> = pool.run(resolver, input.clone()).collect().await;

        assert_eq!(outcomes.len(), input.len());
        let mut seen: Vec<_> = outcomes.iter().map(|o| o.query.clone()).collect();
        let mut expected = input;
        seen.sort();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_limit() {
        let pool = TaskPool::new(3).unwrap();
        let resolver = CountingResolver::new(Duration::from_millis(20));
        let input: Vec<String> = (0..10).map(|i| format!("w{}.example.com", i)).collect();
        let outcomes: Vec<_> = pool.run(resolver.clone(), input).collect().await;

        assert_eq!(outcomes.len(), 10);
        assert!(
            resolver.max_concurrent() <= 3,
            "observed {} concurrent lookups with a limit of 3",
            resolver.max_concurrent()
        );
    }

    #[tokio::test]
    async fn test_single_worker_is_strictly_sequential() {
        let pool = TaskPool::new(1).unwrap();
        let resolver = CountingResolver::new(Duration::from_millis(10));
        let input: Vec<String> = (0..5).map(|i| format!("w{}.example.com", i)).collect();
        let outcomes: Vec<_> = pool.run(resolver.clone(), input).collect().await;

        assert_eq!(outcomes.len(), 5);
        assert_eq!(resolver.max_concurrent(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_isolated_to_its_query() {
        let addr: IpAddr = "10.0.0.1".parse().unwrap();
        let mut answers = HashMap::new();
        answers.insert("ok.example.com".to_string(), Ok(vec![addr]));
        answers.insert(
            "bad.example.com".to_string(),
            Err("connection refused".to_string()),
        );
        answers.insert("empty.example.com".to_string(), Ok(vec![]));

        let pool = TaskPool::new(2).unwrap();
        let resolver = ScriptedResolver::new(answers);
        let input = queries(&["ok.example.com", "bad.example.com", "empty.example.com"]);
        let outcomes: Vec<_> = pool.run(resolver, input).collect().await;

        assert_eq!(outcomes.len(), 3);
        let by_query: HashMap<_, _> = outcomes.iter().map(|o| (o.query.as_str(), o)).collect();
        assert!(by_query["ok.example.com"].is_match());
        assert!(by_query["bad.example.com"].error().is_some());
        assert!(!by_query["empty.example.com"].is_match());
        assert!(by_query["empty.example.com"].error().is_none());
    }

    #[tokio::test]
    async fn test_panicking_worker_still_yields_an_outcome() {
        #[derive(Clone)]
        struct PanickyResolver;

        impl Resolve for PanickyResolver {
            async fn resolve(&self, query: &str) -> Result<Vec<IpAddr>, ScanError> {
                if query.starts_with("boom") {
                    panic!("scripted panic");
                }
                Ok(vec![])
            }
        }

        let pool = TaskPool::new(2).unwrap();
        let input = queries(&["boom.example.com", "fine.example.com"]);
        let outcomes: Vec<_> = pool.run(PanickyResolver, input).collect().await;

        assert_eq!(outcomes.len(), 2);
        let boom = outcomes
            .iter()
            .find(|o| o.query == "boom.example.com")
            .unwrap();
        assert!(matches!(
            boom.lookup,
            LookupResult::Failed(ScanError::Internal { .. })
        ));
    }

    #[tokio::test]
    async fn test_outcomes_arrive_in_completion_order() {
        #[derive(Clone)]
        struct SlowFirstResolver;

        impl Resolve for SlowFirstResolver {
            async fn resolve(&self, query: &str) -> Result<Vec<IpAddr>, ScanError> {
                if query.starts_with("slow") {
                    tokio::time::sleep(Duration::from_millis(80)).await;
                } else {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
                Ok(vec![])
            }
        }

        let pool = TaskPool::new(2).unwrap();
        let input = queries(&["slow.example.com", "fast.example.com"]);
        let outcomes: Vec<_> = pool.run(SlowFirstResolver, input).collect().await;

        assert_eq!(outcomes[0].query, "fast.example.com");
        assert_eq!(outcomes[1].query, "slow.example.com");
    }
}
