// subscout-lib/tests/integration.rs

//! Integration tests for the public scanning API, using stub resolvers so
//! nothing here touches the network.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use subscout_lib::{
    format_outcome, Reporter, Resolve, ScanConfig, ScanError, SubdomainScanner,
};

/// Stub resolver with scripted answers per query, plus an in-flight counter
/// so tests can assert the concurrency ceiling.
#[derive(Clone, Default)]
struct StubResolver {
    answers: Arc<HashMap<String, Result<Vec<IpAddr>, String>>>,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    max_seen: Arc<AtomicUsize>,
}

impl StubResolver {
    fn new(answers: HashMap<String, Result<Vec<IpAddr>, String>>) -> Self {
        Self {
            answers: Arc::new(answers),
            ..Default::default()
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn max_concurrent(&self) -> usize {
        self.max_seen.load(Ordering::SeqCst)
    }
}

impl Resolve for StubResolver {
    async fn resolve(&self, query: &str) -> Result<Vec<IpAddr>, ScanError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_seen.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let result = match self.answers.get(query) {
            Some(Ok(addrs)) => Ok(addrs.clone()),
            Some(Err(msg)) => Err(ScanError::lookup(query, msg.clone())),
            None => Ok(vec![]),
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

fn candidates(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// The canonical scenario: one match, one clean miss, one failing lookup.
fn example_scenario() -> StubResolver {
    let addr: IpAddr = "93.184.216.34".parse().unwrap();
    let mut answers = HashMap::new();
    answers.insert("www.example.com".to_string(), Ok(vec![addr]));
    answers.insert("mail.example.com".to_string(), Ok(vec![]));
    answers.insert(
        "ghost.example.com".to_string(),
        Err("lookup timed out".to_string()),
    );
    StubResolver::new(answers)
}

#[tokio::test]
async fn test_every_candidate_produces_exactly_one_outcome() {
    let scanner = SubdomainScanner::with_resolver(
        ScanConfig::new("example.com").with_concurrency(4),
        StubResolver::default(),
    );

    let input = candidates(&["www", "mail", "ghost", "dev", "www"]);
    let outcomes = scanner.scan(&input).await.unwrap();
    assert_eq!(outcomes.len(), input.len());

    let mut produced: Vec<_> = outcomes.iter().map(|o| o.query.clone()).collect();
    produced.sort();
    let mut expected: Vec<_> = input
        .iter()
        .map(|c| format!("{}.example.com", c))
        .collect();
    expected.sort();
    assert_eq!(produced, expected);
}

#[tokio::test]
async fn test_concurrency_ceiling_is_respected() {
    let resolver = StubResolver::default().with_delay(Duration::from_millis(20));
    let scanner = SubdomainScanner::with_resolver(
        ScanConfig::new("example.com").with_concurrency(3),
        resolver.clone(),
    );

    let input: Vec<String> = (0..12).map(|i| format!("host{}", i)).collect();
    let outcomes = scanner.scan(&input).await.unwrap();

    assert_eq!(outcomes.len(), 12);
    assert!(
        resolver.max_concurrent() <= 3,
        "saw {} concurrent lookups with a limit of 3",
        resolver.max_concurrent()
    );
}

#[tokio::test]
async fn test_single_worker_processes_one_at_a_time() {
    let resolver = StubResolver::default().with_delay(Duration::from_millis(10));
    let scanner = SubdomainScanner::with_resolver(
        ScanConfig::new("example.com").with_concurrency(1),
        resolver.clone(),
    );

    let input = candidates(&["a", "b", "c", "d", "e"]);
    let outcomes = scanner.scan(&input).await.unwrap();

    assert_eq!(outcomes.len(), 5);
    assert_eq!(resolver.max_concurrent(), 1);
}

#[tokio::test]
async fn test_one_failure_does_not_prevent_other_outcomes() {
    let scanner = SubdomainScanner::with_resolver(
        ScanConfig::new("example.com").with_concurrency(2),
        example_scenario(),
    );

    let outcomes = scanner
        .scan(&candidates(&["www", "mail", "ghost"]))
        .await
        .unwrap();
    assert_eq!(outcomes.len(), 3);

    let by_query: HashMap<_, _> = outcomes.iter().map(|o| (o.query.as_str(), o)).collect();
    assert!(by_query["www.example.com"].is_match());
    assert!(!by_query["mail.example.com"].is_match());
    assert!(by_query["mail.example.com"].error().is_none());
    assert!(by_query["ghost.example.com"].error().is_some());
}

#[tokio::test]
async fn test_empty_candidate_set_scans_to_nothing() {
    let scanner = SubdomainScanner::with_resolver(
        ScanConfig::new("example.com"),
        StubResolver::default(),
    );
    let outcomes = scanner.scan(&[]).await.unwrap();
    assert!(outcomes.is_empty());
}

#[tokio::test]
async fn test_reported_lines_match_the_expected_scenario() {
    let scanner = SubdomainScanner::with_resolver(
        ScanConfig::new("example.com").with_concurrency(3),
        example_scenario(),
    );

    // Normal mode: the www match and the ghost error, nothing for mail.
    let outcomes = scanner
        .scan(&candidates(&["www", "mail", "ghost"]))
        .await
        .unwrap();

    let mut normal_lines: Vec<String> = outcomes
        .iter()
        .filter_map(|o| format_outcome(o, false))
        .collect();
    normal_lines.sort();
    assert_eq!(normal_lines.len(), 2);
    assert!(normal_lines.contains(&"www.example.com - 93.184.216.34".to_string()));
    assert!(normal_lines.iter().any(|l| l.contains("ghost.example.com")));

    // Verbose mode adds the "Not found" line for mail.
    let verbose_lines: Vec<String> = outcomes
        .iter()
        .filter_map(|o| format_outcome(o, true))
        .collect();
    assert_eq!(verbose_lines.len(), 3);
    assert!(verbose_lines.contains(&"mail.example.com - Not found".to_string()));
}

#[tokio::test]
async fn test_execute_writes_report_file_and_returns_summary() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.txt");

    let scanner = SubdomainScanner::with_resolver(
        ScanConfig::new("example.com").with_concurrency(2),
        example_scenario(),
    );
    let mut reporter = Reporter::to_file(true, &path).unwrap();
    let summary = scanner
        .execute(&candidates(&["www", "mail", "ghost"]), &mut reporter)
        .await
        .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.matched, 1);
    assert_eq!(summary.unresolved, 1);
    assert_eq!(summary.failed, 1);

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("www.example.com - 93.184.216.34"));
    assert!(written.contains("mail.example.com - Not found"));
    assert!(written.contains("ghost.example.com"));
}

#[tokio::test]
async fn test_fatal_config_error_before_any_lookup() {
    let resolver = StubResolver::default();
    let mut config = ScanConfig::new("example.com");
    config.concurrency = 0;
    let scanner = SubdomainScanner::with_resolver(config, resolver.clone());

    let err = scanner.scan(&candidates(&["www"])).await.unwrap_err();
    assert!(matches!(err, ScanError::Config { .. }));
    assert!(err.is_fatal());
    // Nothing was dispatched.
    assert_eq!(resolver.max_concurrent(), 0);
}
