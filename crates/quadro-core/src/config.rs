use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted store. Required for remote mode.
    pub api_url: Option<String>,
    /// Bearer credential for the hosted store. Required for remote mode.
    pub api_token: Option<String>,
    /// Force guest/isolated mode even when remote credentials are present.
    pub guest: bool,
    /// Root directory for local mirror snapshots.
    pub data_dir: PathBuf,
    /// Timeout of the single remote attempt per operation.
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let data_dir = match env::var("QUADRO_DATA_DIR") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::data_dir()
                .context("Could not find data directory")?
                .join("quadro"),
        };

        let timeout_secs: u64 = env::var("QUADRO_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("QUADRO_REQUEST_TIMEOUT_SECS must be an integer")?;

        Ok(Self {
            api_url: env::var("QUADRO_API_URL").ok().filter(|v| !v.is_empty()),
            api_token: env::var("QUADRO_API_TOKEN").ok().filter(|v| !v.is_empty()),
            guest: matches!(
                env::var("QUADRO_GUEST").as_deref(),
                Ok("1") | Ok("true") | Ok("yes")
            ),
            data_dir,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
