//! Scoreboard binary.
//!
//! Runs the match runtime and serves a display over stdin/stdout, one JSON
//! object per line. Logs go to stderr and, when `SCOREBOARD_LOG_DIR` is set,
//! to `scoreboard.log` in that directory.
//!
//! ```bash
//! MATCH_SECONDS=120 TOTAL_SETS=5 cargo run -p scoreboard-client
//! ```

use anyhow::Result;
use runtime::{LogoStore, Runtime};
use scoreboard_client::{Bridge, ClientConfig, logging};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Load configuration from environment
    let config = ClientConfig::from_env();

    // 2. Setup logging; the guard flushes the file writer on exit
    let _guard = logging::setup_logging(config.log_dir.as_deref())?;

    tracing::info!("Starting scoreboard");
    tracing::info!(
        "Sets: {}, set length: {}s, break: {}s",
        config.runtime.match_config.total_sets,
        config.runtime.match_config.match_seconds,
        config.runtime.match_config.break_seconds
    );
    if let Some(persistence) = &config.runtime.persistence {
        tracing::info!("Results: {}", persistence.results_dir.display());
        tracing::info!("Data: {}", persistence.data_dir.display());
    }

    // 3. Build Runtime
    let logos = config
        .runtime
        .persistence
        .as_ref()
        .map(|persistence| LogoStore::new(&persistence.data_dir));
    let runtime = Runtime::start(config.runtime).await?;

    // 4. Serve the display until stdin closes or Ctrl+C
    let bridge = Bridge::new(runtime.handle(), logos);
    let served = tokio::select! {
        result = bridge.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout()) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
            Ok(())
        }
    };

    runtime.shutdown().await?;
    tracing::info!("Scoreboard stopped");
    served
}
