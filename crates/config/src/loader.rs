//! Parse and validate user configuration.

use std::{ffi::OsStr, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, GridCfg, InteractionCfg, PersistenceCfg, error::excerpt_at};

/// Fully resolved editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub grid: GridCfg,
    pub interaction: InteractionCfg,
    pub persistence: PersistenceCfg,
}

impl Config {
    /// Parse and validate a config from RON text.
    pub fn from_ron(text: &str) -> Result<Self, Error> {
        let cfg: Self = ron::from_str(text).map_err(|e| {
            let message = e.to_string();
            let excerpt = ron_position(&message).map(|(l, c)| excerpt_at(text, l, c));
            Error::Parse {
                path: None,
                message,
                excerpt,
            }
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check value ranges that the type system cannot express.
    pub fn validate(&self) -> Result<(), Error> {
        let invalid = |field: &'static str, message: String| Error::Validation {
            path: None,
            field,
            message,
        };
        if self.grid.columns == 0 {
            return Err(invalid("grid.columns", "must be at least 1".into()));
        }
        if !(self.grid.root_font_px.is_finite() && self.grid.root_font_px > 0.0) {
            return Err(invalid(
                "grid.root_font_px",
                format!("must be positive, got {}", self.grid.root_font_px),
            ));
        }
        if !(self.grid.row_rem.is_finite() && self.grid.row_rem > 0.0) {
            return Err(invalid(
                "grid.row_rem",
                format!("must be positive, got {}", self.grid.row_rem),
            ));
        }
        let t = self.interaction.drag_threshold_px;
        if !(t.is_finite() && t >= 0.0) {
            return Err(invalid(
                "interaction.drag_threshold_px",
                format!("must be zero or positive, got {}", t),
            ));
        }
        Ok(())
    }
}

/// Leading `line:col` of a rendered RON error, if present.
fn ron_position(message: &str) -> Option<(usize, usize)> {
    let mut parts = message.splitn(3, ':');
    let line = parts.next()?.trim().parse().ok()?;
    let col: String = parts
        .next()?
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    Some((line, col.parse().ok()?))
}

/// Load a validated `Config` from a `.ron` file at `path`.
pub fn load_from_path(path: &Path) -> Result<Config, Error> {
    if path.extension() != Some(OsStr::new("ron")) {
        return Err(Error::Read {
            path: Some(path.to_path_buf()),
            message: "Unsupported config format (expected a .ron file)".to_string(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    let cfg = Config::from_ron(&text).map_err(|e| e.with_path(path))?;
    debug!(path = %path.display(), ?cfg, "config loaded");
    Ok(cfg)
}
