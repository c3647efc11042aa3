use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One storefront screenshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenshot {
    #[serde(default)]
    pub path_thumbnail: String,
    #[serde(default)]
    pub path_full: String,
}

/// One storefront trailer/video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    /// Highest-quality WebM stream, when the storefront provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webm_max: Option<String>,
    /// Highest-quality MP4 stream, when the storefront provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mp4_max: Option<String>,
}

/// Media attached to a game's store page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMedia {
    #[serde(default)]
    pub screenshots: Vec<Screenshot>,
    #[serde(default)]
    pub videos: Vec<Video>,
}

/// One DLC belonging to a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlcInfo {
    pub id: u64,
    pub name: String,
}

/// Normalized Steam game metadata, as rendered by the lookup surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDetail {
    /// Steam app id
    pub steam_appid: u64,

    /// Game name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub short_description: String,

    /// Full description (storefront HTML)
    #[serde(default)]
    pub detailed_description: String,

    /// Header image URL
    #[serde(default)]
    pub header_image: String,

    /// Release date as the storefront reports it
    #[serde(default)]
    pub release_date: String,

    /// Developer(s)
    #[serde(default)]
    pub developers: Vec<String>,

    /// Publisher(s)
    #[serde(default)]
    pub publishers: Vec<String>,

    /// Formatted storefront price; absent for free or unpriced titles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    /// Whether the storefront lists the title as free
    #[serde(default)]
    pub is_free: bool,

    /// Screenshots and videos
    #[serde(default)]
    pub media: GameMedia,

    /// DLC list with resolved names
    #[serde(default)]
    pub dlcs: Vec<DlcInfo>,

    /// Timestamp when this result was fetched
    #[serde(default = "Utc::now")]
    pub fetched_at: DateTime<Utc>,
}

impl GameDetail {
    /// Create a new GameDetail with required fields
    pub fn new(steam_appid: u64, name: impl Into<String>) -> Self {
        Self {
            steam_appid,
            name: name.into(),
            short_description: String::new(),
            detailed_description: String::new(),
            header_image: String::new(),
            release_date: String::new(),
            developers: Vec::new(),
            publishers: Vec::new(),
            price: None,
            is_free: false,
            media: GameMedia::default(),
            dlcs: Vec::new(),
            fetched_at: Utc::now(),
        }
    }

    /// Get display name (for logging/UI)
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.steam_appid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_detail_creation() {
        let game = GameDetail::new(730, "Counter-Strike 2");
        assert_eq!(game.steam_appid, 730);
        assert_eq!(game.name, "Counter-Strike 2");
        assert!(game.price.is_none());
        assert!(game.media.screenshots.is_empty());
        assert_eq!(game.display_name(), "Counter-Strike 2 (730)");
    }

    #[test]
    fn test_price_omitted_when_free() {
        let mut game = GameDetail::new(730, "CS2");
        game.is_free = true;

        let json = serde_json::to_value(&game).unwrap();
        assert!(json.get("price").is_none());
        assert_eq!(json["is_free"], true);
    }
}
