use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// Default location of the dashboard's TOML settings.
pub const DEFAULT_CONFIG_PATH: &str = "dashboard.toml";

pub struct EnvConfig {
    /// Path to the TOML file with dashboard settings
    pub config_path: PathBuf,
}

impl EnvConfig {
    pub fn load(manifest_dir: &Path) -> Result<Self> {
        #[cfg(debug_assertions)]
        {
            let dotenv = manifest_dir.join(".env");
            if dotenv.exists() {
                dotenvy::from_path(&dotenv)
                    .with_context(|| format!("Can't read {}", dotenv.display()))?;
            }
        }
        #[cfg(not(debug_assertions))]
        let _ = manifest_dir;

        let config_path = match env::var("DASHBOARD_CONFIG") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            Ok(_) | Err(env::VarError::NotPresent) => PathBuf::from(DEFAULT_CONFIG_PATH),
            Err(e) => return Err(e).context("DASHBOARD_CONFIG is not valid unicode"),
        };

        Ok(Self { config_path })
    }
}

/// Load environment config using the calling crate's manifest directory.
#[macro_export]
macro_rules! load_env_config {
    () => {
        $crate::config::EnvConfig::load(std::path::Path::new(env!("CARGO_MANIFEST_DIR")))
    };
}
