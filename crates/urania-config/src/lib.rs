use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use urania::EngineConfig;

#[derive(Debug, Clone, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    engine: Option<EngineConfig>,
}

/// Locations tried when no explicit path is given, relative to the working
/// directory (repo root first, then from inside a crate).
const DEFAULT_PATHS: [&str; 2] = ["configs/urania.toml", "../../configs/urania.toml"];

fn read_config_text(path: Option<&Path>) -> anyhow::Result<Option<(PathBuf, String)>> {
    if let Some(path) = path {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        return Ok(Some((path.to_path_buf(), text)));
    }
    for p in &DEFAULT_PATHS {
        if let Ok(text) = fs::read_to_string(p) {
            return Ok(Some((PathBuf::from(p), text)));
        }
    }
    Ok(None)
}

/// Parse the `[engine]` table of a TOML document. Missing keys (or a
/// missing table) fall back to the defaults.
pub fn parse_engine_config(text: &str) -> anyhow::Result<EngineConfig> {
    let root: RootConfigToml = toml::from_str(text).context("Failed to parse [engine] config")?;
    let config = root.engine.unwrap_or_default();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid [engine] config: {e}"))?;
    Ok(config)
}

/// Load the engine configuration from `path`, or from `configs/urania.toml`
/// when no path is given. Without a file, the defaults are used; an explicit
/// path that cannot be read is an error.
pub fn load_engine_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match read_config_text(path)? {
        Some((source, text)) => parse_engine_config(&text)
            .with_context(|| format!("Config file {}", source.display())),
        None => Ok(EngineConfig::default()),
    }
}
