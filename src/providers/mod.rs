pub mod steam;

use async_trait::async_trait;

use crate::core::GameDetail;
use crate::error::Result;

pub use steam::SteamProvider;

/// Trait for game metadata providers
#[async_trait]
pub trait GameMetadataProvider: Send + Sync {
    /// Fetch a game by its numeric app id
    async fn get_by_id(&self, appid: &str) -> Result<GameDetail>;

    /// Get provider name
    fn name(&self) -> &str;

    /// Check if provider is reachable
    async fn is_available(&self) -> bool;
}
