pub mod http;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;

use crate::config::SourceDescriptor;
use crate::core::ProbeResult;

pub use http::HttpProbeTransport;

/// Why a probe never produced an HTTP status
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// Probe exceeded the per-probe time budget
    #[error("timeout")]
    Timeout,

    /// TCP/TLS connection could not be established
    #[error("connection failed")]
    Connect,

    /// Any other transport-level failure
    #[error("request failed: {0}")]
    Request(String),
}

/// Trait for existence probes: URL in, status or failure out.
///
/// Only the response status matters to the resolver; implementations must not
/// buffer the body. The production implementation is [`HttpProbeTransport`].
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    /// Issue a single bounded request and report the observed status
    async fn probe(&self, url: &str) -> std::result::Result<u16, ProbeFailure>;
}

/// Multi-source download-availability resolver.
///
/// Holds the immutable mirror-source list and probes every enabled source
/// concurrently, one bounded request each, returning one [`ProbeResult`] per
/// enabled source in configuration order. A single source's failure is
/// contained to its own result and never aborts the batch.
pub struct AvailabilityResolver {
    sources: Vec<SourceDescriptor>,
    transport: Arc<dyn ProbeTransport>,
}

impl AvailabilityResolver {
    /// Resolver backed by real HTTP probes with a fixed per-probe timeout
    pub fn new(sources: Vec<SourceDescriptor>, probe_timeout: Duration) -> Self {
        Self::with_transport(sources, Arc::new(HttpProbeTransport::new(probe_timeout)))
    }

    /// Resolver with an injected probe transport
    pub fn with_transport(sources: Vec<SourceDescriptor>, transport: Arc<dyn ProbeTransport>) -> Self {
        Self { sources, transport }
    }

    /// The configured source list, in probe order
    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    /// Check every enabled source for `appid` and return the full batch.
    ///
    /// The caller has already validated the id as a non-empty numeric string.
    /// No sources enabled yields an empty batch, not an error. Each source
    /// gets exactly one probe per call; nothing is cached between calls.
    /// Dropping the returned future abandons all in-flight probes.
    pub async fn resolve(&self, appid: &str) -> Vec<ProbeResult> {
        let enabled: Vec<&SourceDescriptor> =
            self.sources.iter().filter(|s| s.enabled).collect();

        if enabled.is_empty() {
            tracing::warn!("no enabled mirror sources configured");
            return Vec::new();
        }

        tracing::debug!("probing {} sources for app id {}", enabled.len(), appid);

        // join_all preserves input order, so the batch follows configuration
        // order no matter which probe finishes first.
        join_all(
            enabled
                .into_iter()
                .map(|source| self.probe_source(source, appid)),
        )
        .await
    }

    async fn probe_source(&self, source: &SourceDescriptor, appid: &str) -> ProbeResult {
        let url = source.expand(appid);

        match self.transport.probe(&url).await {
            Ok(status) if status == source.success_code => {
                tracing::debug!("{}: available ({})", source.name, status);
                ProbeResult::found(&source.name, url, status)
            }
            Ok(status) if status == source.unavailable_code => {
                tracing::debug!("{}: not available ({})", source.name, status);
                ProbeResult::not_found(&source.name, status)
            }
            Ok(status) => {
                tracing::warn!("{}: unexpected status {}", source.name, status);
                ProbeResult::unexpected(&source.name, status)
            }
            Err(failure) => {
                tracing::warn!("{}: probe failed: {}", source.name, failure);
                ProbeResult::failed(&source.name, failure.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Instant;

    /// Fake transport answering from a URL -> outcome table, with optional
    /// per-URL delays
    struct FakeTransport {
        outcomes: HashMap<String, std::result::Result<u16, ProbeFailure>>,
        delays: HashMap<String, Duration>,
    }

    impl FakeTransport {
        fn new() -> Self {
            Self {
                outcomes: HashMap::new(),
                delays: HashMap::new(),
            }
        }

        fn with(mut self, url: &str, outcome: std::result::Result<u16, ProbeFailure>) -> Self {
            self.outcomes.insert(url.to_string(), outcome);
            self
        }

        fn delayed(mut self, url: &str, delay: Duration) -> Self {
            self.delays.insert(url.to_string(), delay);
            self
        }
    }

    #[async_trait]
    impl ProbeTransport for FakeTransport {
        async fn probe(&self, url: &str) -> std::result::Result<u16, ProbeFailure> {
            if let Some(delay) = self.delays.get(url) {
                tokio::time::sleep(*delay).await;
            }
            self.outcomes
                .get(url)
                .cloned()
                .unwrap_or(Err(ProbeFailure::Connect))
        }
    }

    /// Transport that answers every probe with the same status
    struct StatusTransport(u16);

    #[async_trait]
    impl ProbeTransport for StatusTransport {
        async fn probe(&self, _url: &str) -> std::result::Result<u16, ProbeFailure> {
            Ok(self.0)
        }
    }

    fn source(name: &str) -> SourceDescriptor {
        SourceDescriptor {
            name: name.to_string(),
            url_template: format!("https://{}.example.com/<appid>", name),
            success_code: 200,
            unavailable_code: 404,
            enabled: true,
        }
    }

    fn resolver(
        sources: Vec<SourceDescriptor>,
        transport: impl ProbeTransport + 'static,
    ) -> AvailabilityResolver {
        AvailabilityResolver::with_transport(sources, Arc::new(transport))
    }

    #[tokio::test]
    async fn test_success_code_yields_available_with_substituted_url() {
        let transport = FakeTransport::new().with("https://a.example.com/123", Ok(200));
        let results = resolver(vec![source("a")], transport).resolve("123").await;

        assert_eq!(results.len(), 1);
        assert!(results[0].available);
        assert_eq!(results[0].direct_url.as_deref(), Some("https://a.example.com/123"));
        assert_eq!(results[0].status, Some(200));
        assert!(results[0].error.is_none());
    }

    #[tokio::test]
    async fn test_unavailable_code_yields_no_error() {
        let transport = FakeTransport::new().with("https://a.example.com/123", Ok(404));
        let results = resolver(vec![source("a")], transport).resolve("123").await;

        assert!(!results[0].available);
        assert!(results[0].direct_url.is_none());
        assert_eq!(results[0].status, Some(404));
        assert!(results[0].error.is_none());
    }

    #[tokio::test]
    async fn test_unexpected_status_yields_error() {
        let transport = FakeTransport::new().with("https://a.example.com/123", Ok(503));
        let results = resolver(vec![source("a")], transport).resolve("123").await;

        assert!(!results[0].available);
        assert_eq!(results[0].status, Some(503));
        assert_eq!(results[0].error.as_deref(), Some("unexpected status 503"));
    }

    #[tokio::test]
    async fn test_timeout_yields_no_status_and_error() {
        let transport =
            FakeTransport::new().with("https://c.example.com/123", Err(ProbeFailure::Timeout));
        let results = resolver(vec![source("c")], transport).resolve("123").await;

        assert!(!results[0].available);
        assert!(results[0].status.is_none());
        assert_eq!(results[0].error.as_deref(), Some("timeout"));
    }

    #[tokio::test]
    async fn test_batch_follows_configuration_order_not_completion_order() {
        // first source is the slowest; it must still come back first
        let transport = FakeTransport::new()
            .with("https://a.example.com/123", Ok(200))
            .delayed("https://a.example.com/123", Duration::from_millis(100))
            .with("https://b.example.com/123", Ok(404))
            .with("https://c.example.com/123", Ok(200));

        let results = resolver(vec![source("a"), source("b"), source("c")], transport)
            .resolve("123")
            .await;

        let names: Vec<&str> = results.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_one_result_per_enabled_source() {
        let sources: Vec<SourceDescriptor> =
            ["a", "b", "c", "d", "e"].iter().map(|n| source(n)).collect();
        let results = resolver(sources, StatusTransport(200)).resolve("1").await;
        assert_eq!(results.len(), 5);
    }

    #[tokio::test]
    async fn test_disabled_source_is_excluded() {
        let mut b = source("b");
        b.enabled = false;
        let results = resolver(
            vec![source("a"), b, source("c")],
            StatusTransport(200),
        )
        .resolve("1")
        .await;

        let names: Vec<&str> = results.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_reenabled_source_returns_at_original_position() {
        let mut b = source("b");
        b.enabled = false;
        let disabled = resolver(
            vec![source("a"), b.clone(), source("c")],
            StatusTransport(200),
        );
        assert_eq!(disabled.resolve("1").await.len(), 2);

        b.enabled = true;
        let reenabled = resolver(vec![source("a"), b, source("c")], StatusTransport(200));
        let names: Vec<String> = reenabled
            .resolve("1")
            .await
            .into_iter()
            .map(|r| r.source)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_all_disabled_yields_empty_batch() {
        let sources: Vec<SourceDescriptor> = ["a", "b"]
            .iter()
            .map(|n| {
                let mut s = source(n);
                s.enabled = false;
                s
            })
            .collect();
        let results = resolver(sources, StatusTransport(200)).resolve("1").await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_one_failing_source_does_not_abort_the_batch() {
        let transport = FakeTransport::new()
            .with("https://a.example.com/123", Ok(200))
            .with("https://b.example.com/123", Err(ProbeFailure::Connect))
            .with("https://c.example.com/123", Ok(404));

        let results = resolver(vec![source("a"), source("b"), source("c")], transport)
            .resolve("123")
            .await;

        assert_eq!(results.len(), 3);
        assert!(results[0].available);
        assert_eq!(results[1].error.as_deref(), Some("connection failed"));
        assert!(!results[2].available);
        assert!(results[2].error.is_none());
    }

    #[tokio::test]
    async fn test_probes_run_concurrently() {
        let delay = Duration::from_millis(100);
        let names = ["a", "b", "c", "d"];

        let mut transport = FakeTransport::new();
        for name in names {
            let url = format!("https://{}.example.com/1", name);
            transport = transport.with(&url, Ok(200)).delayed(&url, delay);
        }
        let sources: Vec<SourceDescriptor> = names.iter().map(|n| source(n)).collect();

        let start = Instant::now();
        let results = resolver(sources, transport).resolve("1").await;
        let elapsed = start.elapsed();

        assert_eq!(results.len(), 4);
        // four 100ms probes in parallel must come in well under the serial 400ms
        assert!(
            elapsed < Duration::from_millis(350),
            "batch took {:?}, probes ran serially",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_concurrent_calls_do_not_cross_contaminate() {
        let resolver = Arc::new(resolver(
            vec![source("a"), source("b")],
            StatusTransport(200),
        ));

        let (first, second) = tokio::join!(resolver.resolve("111"), resolver.resolve("222"));

        for result in &first {
            let url = result.direct_url.as_deref().unwrap();
            assert!(url.ends_with("/111"), "wrong id in {}", url);
        }
        for result in &second {
            let url = result.direct_url.as_deref().unwrap();
            assert!(url.ends_with("/222"), "wrong id in {}", url);
        }
    }
}
