use crate::error::{EngineError, Result};
use crate::types::config::EngineConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "checkin.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".checkin/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/checkin/config.toml";

/// Loads the effective configuration: global file, then `explicit` (or
/// `checkin.toml` under `cwd`), then `.checkin/local.toml` beside it.
/// Missing optional layers are skipped; a missing explicit file is an error.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<EngineConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(explicit, cwd, global.as_deref())
}

pub(crate) fn load_config_with_global(
    explicit: Option<&Path>,
    cwd: &Path,
    global_path: Option<&Path>,
) -> Result<EngineConfig> {
    let repo_path = match explicit {
        Some(path) if !path.exists() => {
            return Err(EngineError::PathNotFound(path.display().to_string()));
        }
        Some(path) => path.to_path_buf(),
        None => cwd.join(DEFAULT_CONFIG_FILE),
    };
    let base_dir = repo_path.parent().unwrap_or(cwd).to_path_buf();

    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &repo_path)?;
    merge_file_if_exists(&mut merged, &base_dir.join(DEFAULT_LOCAL_FILE))?;

    let cfg: EngineConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| EngineError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    debug!(path = %path.display(), "merging config layer");
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| EngineError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}
