//! Client configuration loaded from the process environment.
use std::env;
use std::path::PathBuf;

use runtime::RuntimeConfig;

#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub runtime: RuntimeConfig,
    /// Also write logs to `scoreboard.log` in this directory.
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Runtime variables are documented on [`RuntimeConfig::from_env`].
    /// Client variables:
    /// - `SCOREBOARD_LOG_DIR` - Enable file logging into this directory
    pub fn from_env() -> Self {
        Self {
            runtime: RuntimeConfig::from_env(),
            log_dir: env::var_os("SCOREBOARD_LOG_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
        }
    }
}
