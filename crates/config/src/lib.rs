//! Configuration for the tilegrid editor: grid shape, gesture tuning and
//! persistence strategy, loaded from RON.
#![allow(missing_docs)]

use std::{
    env,
    path::{Path, PathBuf},
};

mod error;
mod loader;
mod types;

#[cfg(test)]
mod test_parse;

pub use error::{Error, excerpt_at};
pub use loader::{Config, load_from_path};
pub use tilegrid_geom::Rounding;
pub use types::{GridCfg, InteractionCfg, PersistenceCfg, SaveStrategy};

/// Environment variable that overrides the config location.
pub const CONFIG_ENV: &str = "TILEGRID_CONFIG";

/// Determine the preferred user config path (`~/.tilegrid/config.ron`).
pub fn default_config_path() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".tilegrid");
    p.push("config.ron");
    p
}

/// Resolve the effective config path.
///
/// Policy:
/// 1) Use `explicit` when provided.
/// 2) Else use `$TILEGRID_CONFIG` when set.
/// 3) Else use `~/.tilegrid/config.ron` when it exists.
/// 4) Else `None`, meaning built-in defaults.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(p) = env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(p));
    }
    let default = default_config_path();
    default.exists().then_some(default)
}

/// Load the config at the resolved path, or defaults when none exists.
pub fn load_or_default(explicit: Option<&Path>) -> Result<Config, Error> {
    match resolve_config_path(explicit) {
        Some(path) => load_from_path(&path),
        None => {
            tracing::debug!("no config file found; using defaults");
            Ok(Config::default())
        }
    }
}
