//! # SteamDL Engine
//!
//! Steam game lookup and mirror download-availability engine with:
//! - Storefront metadata lookup by numeric app id (name, media, price, DLC)
//! - Concurrent multi-source download-availability resolver
//! - Async/await architecture
//! - Multiple interfaces: Rust library, HTTP API, CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use steamdl_engine::{GameDlEngine, MirrorConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = GameDlEngine::new(MirrorConfig::default())?;
//!
//!     let game = engine.lookup("730").await?;
//!     let batch = engine.check_download("730").await;
//!
//!     let hits = batch.iter().filter(|r| r.available).count();
//!     println!("{}: {}/{} mirrors", game.name, hits, batch.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod providers;
pub mod resolver;

// Re-export primary types
pub use config::{MirrorConfig, SourceDescriptor, APPID_PLACEHOLDER};
pub use core::{GameDetail, ProbeResult};
pub use engine::{validate_appid, GameDlEngine};
pub use error::{EngineError, Result};
pub use resolver::{AvailabilityResolver, ProbeFailure, ProbeTransport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
