use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{EngineError, Result};

/// Identifier placeholder expected in every mirror URL template.
pub const APPID_PLACEHOLDER: &str = "<appid>";

fn default_enabled() -> bool {
    true
}

fn default_probe_timeout() -> u64 {
    10
}

/// One mirror download endpoint and its status-code contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Human-readable label, unique among enabled sources
    pub name: String,

    /// URL containing the `<appid>` placeholder exactly once
    #[serde(rename = "url")]
    pub url_template: String,

    /// HTTP status meaning the content is downloadable here
    pub success_code: u16,

    /// HTTP status meaning the content is confirmed absent
    pub unavailable_code: u16,

    /// Disabled sources are never probed and never appear in results
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl SourceDescriptor {
    /// Substitute the app id into the URL template, exactly once.
    pub fn expand(&self, appid: &str) -> String {
        self.url_template
            .replacen(APPID_PLACEHOLDER, &urlencoding::encode(appid), 1)
    }
}

/// Static mirror-source configuration, loaded once at startup and immutable
/// for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Ordered mirror list; probe results follow this order
    #[serde(rename = "api_list")]
    pub sources: Vec<SourceDescriptor>,

    /// Upper bound for a single probe, in seconds
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        let mirror = |name: &str, url: &str| SourceDescriptor {
            name: name.to_string(),
            url_template: url.to_string(),
            success_code: 200,
            unavailable_code: 404,
            enabled: true,
        };

        Self {
            sources: vec![
                mirror(
                    "TwentyTwo Cloud",
                    "http://masss.pythonanywhere.com/storage?auth=IEOIJE54esfsipoE56GE4&appid=<appid>",
                ),
                mirror("Sadie", "https://mellyiscoolaf.pythonanywhere.com/m/<appid>"),
                mirror("Ryuu", "https://mellyiscoolaf.pythonanywhere.com/<appid>"),
                mirror(
                    "Sushi",
                    "https://raw.githubusercontent.com/sushi-dev55/sushitools-games-repo/refs/heads/main/<appid>.zip",
                ),
            ],
            probe_timeout_secs: default_probe_timeout(),
        }
    }
}

impl MirrorConfig {
    /// Load and validate a mirror configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject misconfigured sources at startup, so a bad template never
    /// surfaces as a transient per-call "unavailable".
    ///
    /// An empty source list is a valid (if degenerate) configuration.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(EngineError::Config(
                    "source name must not be empty".to_string(),
                ));
            }

            let occurrences = source.url_template.matches(APPID_PLACEHOLDER).count();
            if occurrences != 1 {
                return Err(EngineError::Config(format!(
                    "source '{}': url template must contain {} exactly once (found {})",
                    source.name, APPID_PLACEHOLDER, occurrences
                )));
            }

            if reqwest::Url::parse(&source.expand("0")).is_err() {
                return Err(EngineError::Config(format!(
                    "source '{}': url template is not a valid URL",
                    source.name
                )));
            }

            if source.success_code == source.unavailable_code {
                return Err(EngineError::Config(format!(
                    "source '{}': success and unavailable codes must differ",
                    source.name
                )));
            }

            if source.enabled && !seen.insert(source.name.clone()) {
                return Err(EngineError::Config(format!(
                    "duplicate enabled source name '{}'",
                    source.name
                )));
            }
        }

        Ok(())
    }
}
