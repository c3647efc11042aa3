use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::core::{DlcInfo, GameDetail, GameMedia, Screenshot, Video};
use crate::error::{EngineError, Result};
use crate::providers::GameMetadataProvider;

const STORE_API_URL: &str = "https://store.steampowered.com/api/appdetails";

/// appdetails carries DLC ids only; each name needs one follow-up call
const MAX_DLC_LOOKUPS: usize = 10;

/// Steam storefront metadata provider
pub struct SteamProvider {
    client: Client,
}

#[derive(Debug, Deserialize)]
struct AppDetailsResponse {
    #[serde(flatten)]
    apps: HashMap<String, AppDetailsEntry>,
}

#[derive(Debug, Deserialize)]
struct AppDetailsEntry {
    success: bool,
    #[serde(default)]
    data: Option<SteamAppDetails>,
}

#[derive(Debug, Deserialize, Default)]
struct SteamAppDetails {
    #[serde(default)]
    name: String,
    #[serde(default)]
    steam_appid: u64,
    #[serde(default)]
    is_free: bool,
    #[serde(default)]
    short_description: String,
    #[serde(default)]
    detailed_description: String,
    #[serde(default)]
    header_image: String,
    #[serde(default)]
    developers: Vec<String>,
    #[serde(default)]
    publishers: Vec<String>,
    #[serde(default)]
    price_overview: Option<SteamPriceOverview>,
    #[serde(default)]
    release_date: SteamReleaseDate,
    #[serde(default)]
    screenshots: Vec<SteamScreenshot>,
    #[serde(default)]
    movies: Vec<SteamMovie>,
    #[serde(default)]
    dlc: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct SteamPriceOverview {
    #[serde(default)]
    final_formatted: String,
}

#[derive(Debug, Deserialize, Default)]
struct SteamReleaseDate {
    #[serde(default)]
    date: String,
}

#[derive(Debug, Deserialize)]
struct SteamScreenshot {
    #[serde(default)]
    path_thumbnail: String,
    #[serde(default)]
    path_full: String,
}

#[derive(Debug, Deserialize)]
struct SteamMovie {
    #[serde(default)]
    name: String,
    #[serde(default)]
    thumbnail: String,
    #[serde(default)]
    webm: SteamMovieFormats,
    #[serde(default)]
    mp4: SteamMovieFormats,
}

#[derive(Debug, Deserialize, Default)]
struct SteamMovieFormats {
    #[serde(default)]
    max: String,
}

impl SteamProvider {
    /// Create new Steam provider
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch raw appdetails for one app id
    async fn fetch_details(&self, appid: &str) -> Result<SteamAppDetails> {
        let url = format!("{}?appids={}", STORE_API_URL, urlencoding::encode(appid));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EngineError::Provider {
                provider: "steam".to_string(),
                message: format!("Details request failed: {}", e),
            })?;

        if !response.status().is_success() {
            return Err(EngineError::Provider {
                provider: "steam".to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let mut details_response: AppDetailsResponse =
            response.json().await.map_err(|e| EngineError::Provider {
                provider: "steam".to_string(),
                message: format!("Invalid JSON: {}", e),
            })?;

        // Response is keyed by the requested app id: { "<appid>": { success, data } }
        let entry = details_response
            .apps
            .remove(appid)
            .ok_or_else(|| EngineError::GameNotFound(appid.to_string()))?;

        if !entry.success {
            return Err(EngineError::GameNotFound(appid.to_string()));
        }

        entry
            .data
            .ok_or_else(|| EngineError::GameNotFound(appid.to_string()))
    }

    /// Resolve DLC ids to names, tolerating per-item failures
    async fn resolve_dlc_names(&self, dlc_ids: &[u64]) -> Vec<DlcInfo> {
        let mut dlcs = Vec::new();

        for &id in dlc_ids.iter().take(MAX_DLC_LOOKUPS) {
            let name = match self.fetch_details(&id.to_string()).await {
                Ok(details) => details.name,
                Err(e) => {
                    tracing::warn!("Failed to fetch DLC {}: {}", id, e);
                    format!("DLC {}", id)
                }
            };
            dlcs.push(DlcInfo { id, name });

            // Small delay to avoid rate limiting
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        if dlc_ids.len() > MAX_DLC_LOOKUPS {
            tracing::debug!(
                "resolved {} of {} DLC names",
                MAX_DLC_LOOKUPS,
                dlc_ids.len()
            );
        }

        dlcs
    }

    /// Convert raw appdetails to GameDetail
    fn details_to_game(&self, details: &SteamAppDetails) -> GameDetail {
        let screenshots = details
            .screenshots
            .iter()
            .map(|s| Screenshot {
                path_thumbnail: s.path_thumbnail.clone(),
                path_full: s.path_full.clone(),
            })
            .collect();

        let videos = details
            .movies
            .iter()
            .map(|m| Video {
                title: m.name.clone(),
                thumbnail: m.thumbnail.clone(),
                webm_max: (!m.webm.max.is_empty()).then(|| m.webm.max.clone()),
                mp4_max: (!m.mp4.max.is_empty()).then(|| m.mp4.max.clone()),
            })
            .collect();

        let mut game = GameDetail::new(details.steam_appid, &details.name);
        game.short_description = details.short_description.clone();
        game.detailed_description = details.detailed_description.clone();
        game.header_image = details.header_image.clone();
        game.release_date = details.release_date.date.clone();
        game.developers = details.developers.clone();
        game.publishers = details.publishers.clone();
        game.is_free = details.is_free;
        game.price = details
            .price_overview
            .as_ref()
            .filter(|p| !p.final_formatted.is_empty())
            .map(|p| p.final_formatted.clone());
        game.media = GameMedia {
            screenshots,
            videos,
        };

        game
    }
}

#[async_trait]
impl GameMetadataProvider for SteamProvider {
    async fn get_by_id(&self, appid: &str) -> Result<GameDetail> {
        let details = self.fetch_details(appid).await?;
        let mut game = self.details_to_game(&details);

        if !details.dlc.is_empty() {
            game.dlcs = self.resolve_dlc_names(&details.dlc).await;
        }

        Ok(game)
    }

    fn name(&self) -> &str {
        "steam"
    }

    async fn is_available(&self) -> bool {
        // Try to fetch a known app (CS2 - 730)
        self.fetch_details("730").await.is_ok()
    }
}
