use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{ProbeFailure, ProbeTransport};

/// Probe transport backed by real HTTP GETs.
///
/// The fixed per-probe timeout is built into the client; only the response
/// status is read and the body is dropped unread.
pub struct HttpProbeTransport {
    client: Client,
}

impl HttpProbeTransport {
    /// Create a transport with a fixed per-probe timeout
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

#[async_trait]
impl ProbeTransport for HttpProbeTransport {
    async fn probe(&self, url: &str) -> Result<u16, ProbeFailure> {
        match self.client.get(url).send().await {
            Ok(response) => Ok(response.status().as_u16()),
            Err(e) if e.is_timeout() => Err(ProbeFailure::Timeout),
            Err(e) if e.is_connect() => Err(ProbeFailure::Connect),
            Err(e) => Err(ProbeFailure::Request(e.to_string())),
        }
    }
}
