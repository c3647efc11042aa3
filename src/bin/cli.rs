use clap::{Parser, Subcommand};
use steamdl_engine::{validate_appid, GameDlEngine, MirrorConfig};

#[derive(Parser)]
#[command(name = "steamdl-cli")]
#[command(about = "SteamDL Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Mirror config path (JSON); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a game's Steam metadata
    Lookup {
        /// Numeric Steam app id
        appid: String,
    },

    /// Check download availability across the mirror sources
    Check {
        /// Numeric Steam app id
        appid: String,
    },

    /// List the configured mirror sources
    Sources,
}

fn join_or_na(values: &[String]) -> String {
    if values.is_empty() {
        "N/A".to_string()
    } else {
        values.join(", ")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => MirrorConfig::load(path)?,
        None => MirrorConfig::default(),
    };

    let engine = GameDlEngine::new(config)?;

    match cli.command {
        Commands::Lookup { appid } => {
            validate_appid(&appid)?;
            println!("🔍 Looking up app id: {}", appid);

            let game = engine.lookup(&appid).await?;

            println!("\n✅ Found: {}", game.name);
            println!("   Steam ID: {}", game.steam_appid);
            println!(
                "   Release: {}",
                if game.release_date.is_empty() {
                    "N/A"
                } else {
                    game.release_date.as_str()
                }
            );
            println!("   Developers: {}", join_or_na(&game.developers));
            println!("   Publishers: {}", join_or_na(&game.publishers));
            println!("   Price: {}", game.price.as_deref().unwrap_or("Free"));
            println!(
                "   Media: {} screenshots, {} videos",
                game.media.screenshots.len(),
                game.media.videos.len()
            );

            if !game.dlcs.is_empty() {
                println!("\n🎁 DLC:");
                for dlc in &game.dlcs {
                    println!("   {} ({})", dlc.name, dlc.id);
                }
            }
        }

        Commands::Check { appid } => {
            validate_appid(&appid)?;
            println!("📥 Checking download availability for: {}", appid);

            let results = engine.check_download(&appid).await;

            if results.is_empty() {
                println!("⚠️  No mirror sources enabled");
                return Ok(());
            }

            println!();
            for result in &results {
                if result.available {
                    println!(
                        "   ✅ {}: {}",
                        result.source,
                        result.direct_url.as_deref().unwrap_or("")
                    );
                } else if let Some(error) = &result.error {
                    println!("   ❌ {}: {}", result.source, error);
                } else {
                    println!(
                        "   ❌ {}: unavailable (status {})",
                        result.source,
                        result
                            .status
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| "?".to_string())
                    );
                }
            }

            let hits = results.iter().filter(|r| r.available).count();
            println!("\n📦 {}/{} sources available", hits, results.len());
        }

        Commands::Sources => {
            println!("📡 Mirror sources:");
            for source in engine.sources() {
                let flag = if source.enabled { "✅" } else { "⏸️ " };
                println!(
                    "   {} {} → {} (ok={}, missing={})",
                    flag, source.name, source.url_template, source.success_code, source.unavailable_code
                );
            }
        }
    }

    Ok(())
}
