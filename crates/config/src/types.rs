use serde::{Deserialize, Serialize};
use tilegrid_geom::{GridGeometry, Rounding};

/// Grid shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridCfg {
    /// Total column count.
    pub columns: u32,
    /// Root font size in pixels (CSS `rem`).
    pub root_font_px: f64,
    /// Row height as a multiple of the root font size.
    pub row_rem: f64,
}

impl Default for GridCfg {
    fn default() -> Self {
        Self {
            columns: 20,
            root_font_px: 16.0,
            row_rem: 2.0,
        }
    }
}

impl GridCfg {
    /// Row height in pixels.
    pub fn row_height(&self) -> f64 {
        self.root_font_px * self.row_rem
    }

    /// Geometry for a container `container_width` pixels wide.
    pub fn geometry(&self, container_width: f64) -> GridGeometry {
        GridGeometry::from_root_font(
            self.columns,
            container_width,
            self.root_font_px,
            self.row_rem,
        )
    }
}

/// Gesture tuning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InteractionCfg {
    /// Pointer travel (pixels, either axis) before an armed gesture starts moving.
    pub drag_threshold_px: f64,
    /// Tie-breaking for pixel to cell snapping.
    pub rounding: Rounding,
}

/// When committed changes are sent to the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStrategy {
    /// Save each widget as soon as a gesture commits (dashboard grid).
    #[default]
    Incremental,
    /// Only the Save action persists, sending the full layout (record layout).
    Batched,
}

/// Persistence behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersistenceCfg {
    pub strategy: SaveStrategy,
}
