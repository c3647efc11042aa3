use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{MirrorConfig, SourceDescriptor};
use crate::core::{GameDetail, ProbeResult};
use crate::error::{EngineError, Result};
use crate::providers::{GameMetadataProvider, SteamProvider};
use crate::resolver::AvailabilityResolver;

/// Validate a caller-supplied app id (non-empty, digits only).
///
/// UI surfaces call this before touching the engine; the resolver itself
/// assumes an already validated id.
pub fn validate_appid(appid: &str) -> Result<()> {
    if appid.trim().is_empty() {
        return Err(EngineError::InvalidAppId(
            "app id must not be empty".to_string(),
        ));
    }
    if !appid.chars().all(|c| c.is_ascii_digit()) {
        return Err(EngineError::InvalidAppId(format!(
            "app id must be numeric, got '{}'",
            appid
        )));
    }
    Ok(())
}

/// Main orchestrator: metadata lookup plus download-availability checks
pub struct GameDlEngine {
    provider: Arc<dyn GameMetadataProvider>,
    resolver: AvailabilityResolver,
}

impl GameDlEngine {
    /// Engine with the Steam storefront provider and real HTTP probes
    pub fn new(config: MirrorConfig) -> Result<Self> {
        config.validate()?;

        let resolver = AvailabilityResolver::new(
            config.sources,
            Duration::from_secs(config.probe_timeout_secs),
        );

        Ok(Self {
            provider: Arc::new(SteamProvider::new()),
            resolver,
        })
    }

    /// Engine with injected parts
    pub fn with_parts(
        provider: Arc<dyn GameMetadataProvider>,
        resolver: AvailabilityResolver,
    ) -> Self {
        Self { provider, resolver }
    }

    /// The configured mirror sources, in probe order
    pub fn sources(&self) -> &[SourceDescriptor] {
        self.resolver.sources()
    }

    /// Fetch normalized metadata for a game
    pub async fn lookup(&self, appid: &str) -> Result<GameDetail> {
        let start = Instant::now();
        let game = self.provider.get_by_id(appid).await?;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        tracing::info!(
            "{} → {} via {} ({:.0}ms)",
            appid,
            game.name,
            self.provider.name(),
            latency_ms
        );

        Ok(game)
    }

    /// Probe every enabled mirror source for a game.
    ///
    /// Each call starts a completely fresh resolution; nothing is cached or
    /// reused between invocations.
    pub async fn check_download(&self, appid: &str) -> Vec<ProbeResult> {
        let results = self.resolver.resolve(appid).await;

        let hits = results.iter().filter(|r| r.available).count();
        tracing::info!("{}: {}/{} sources available", appid, hits, results.len());

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_appids() {
        validate_appid("730").unwrap();
        validate_appid("0").unwrap();
        validate_appid("1091500").unwrap();
    }

    #[test]
    fn test_empty_appid_rejected() {
        assert!(matches!(
            validate_appid(""),
            Err(EngineError::InvalidAppId(_))
        ));
        assert!(matches!(
            validate_appid("   "),
            Err(EngineError::InvalidAppId(_))
        ));
    }

    #[test]
    fn test_non_numeric_appid_rejected() {
        assert!(validate_appid("abc").is_err());
        assert!(validate_appid("73O").is_err());
        assert!(validate_appid("-730").is_err());
        assert!(validate_appid("7 30").is_err());
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let config = MirrorConfig {
            sources: vec![SourceDescriptor {
                name: "broken".to_string(),
                url_template: "https://x.example.com/no-placeholder".to_string(),
                success_code: 200,
                unavailable_code: 404,
                enabled: true,
            }],
            probe_timeout_secs: 10,
        };

        assert!(matches!(
            GameDlEngine::new(config),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_engine_accepts_default_config() {
        let engine = GameDlEngine::new(MirrorConfig::default()).unwrap();
        assert_eq!(engine.sources().len(), 4);
    }
}
