// Probe configuration loading

use crate::error::{AllowlistError, Result};
use std::fs;
use std::path::Path;
use suffix_roots_prober::ProbeConfig;

/// Load a `ProbeConfig` from a JSON file. Missing keys take their defaults.
pub fn load_probe_config(path: &Path) -> Result<ProbeConfig> {
    let contents = fs::read_to_string(path).map_err(|source| AllowlistError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;

    let config: ProbeConfig =
        serde_json::from_str(&contents).map_err(|source| AllowlistError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })?;

    config.validate()?;
    Ok(config)
}
