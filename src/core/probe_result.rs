use serde::{Deserialize, Serialize};

/// Outcome of probing one mirror source for one app id.
///
/// Exactly one result is produced per enabled source per resolver call, in
/// configuration order. `available` is true only when the probe observed the
/// source's configured success code; only then does `direct_url` carry the
/// substituted download URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Source label, copied from the descriptor
    #[serde(rename = "name")]
    pub source: String,

    /// True only when the observed status equals the source's success code
    pub available: bool,

    /// Fully substituted download URL, present only when available
    #[serde(rename = "directUrl")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_url: Option<String>,

    /// Raw observed HTTP status, absent when the probe never completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Diagnostic for probes that failed or saw an unexpected status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeResult {
    /// Probe observed the success code
    pub fn found(source: impl Into<String>, direct_url: impl Into<String>, status: u16) -> Self {
        Self {
            source: source.into(),
            available: true,
            direct_url: Some(direct_url.into()),
            status: Some(status),
            error: None,
        }
    }

    /// Probe observed the unavailable code (confirmed absent, not an error)
    pub fn not_found(source: impl Into<String>, status: u16) -> Self {
        Self {
            source: source.into(),
            available: false,
            direct_url: None,
            status: Some(status),
            error: None,
        }
    }

    /// Probe observed a status matching neither configured code
    pub fn unexpected(source: impl Into<String>, status: u16) -> Self {
        Self {
            source: source.into(),
            available: false,
            direct_url: None,
            status: Some(status),
            error: Some(format!("unexpected status {}", status)),
        }
    }

    /// Probe never completed (timeout, connection failure, ...)
    pub fn failed(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            available: false,
            direct_url: None,
            status: None,
            error: Some(error.into()),
        }
    }
}
