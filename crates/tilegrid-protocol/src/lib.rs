//! Shared protocol types for tilegrid.
//!
//! Two surfaces live here:
//! - the backend wire shape of layout loads and saves (camelCase JSON), and
//! - messages the engine sends back to the hosting page ([`MsgToHost`]).
#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use tilegrid_geom::Rect;
use tilegrid_ids::WidgetId;

pub mod codec;

/// One widget's placement as exchanged with the backend.
///
/// Loads carry the id as `widgetId`, saves emit it as `id`; both are
/// accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRecord {
    /// Widget identifier.
    #[serde(alias = "widgetId")]
    pub id: WidgetId,
    /// Cell footprint.
    #[serde(flatten)]
    pub rect: Rect,
}

impl LayoutRecord {
    /// Pair an id with its rectangle.
    pub fn new(id: WidgetId, rect: Rect) -> Self {
        Self { id, rect }
    }
}

impl From<(WidgetId, Rect)> for LayoutRecord {
    fn from((id, rect): (WidgetId, Rect)) -> Self {
        Self { id, rect }
    }
}

/// Body of the full-layout save issued by the Save action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveLayoutRequest {
    /// Every widget of the view, in load order.
    pub layout: Vec<LayoutRecord>,
}

/// Body of an incremental save for one widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveWidgetRequest {
    /// The widget and its new rectangle.
    #[serde(flatten)]
    pub record: LayoutRecord,
}

/// Minimal backend reply to either save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    /// True when the backend accepted the save.
    pub success: bool,
    /// Optional human-readable reason, usually present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SaveResponse {
    /// Successful reply with no message.
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Rejected reply carrying `message`.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Which save produced a [`MsgToHost::Saved`] message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveScope {
    /// Full layout.
    Layout,
    /// One widget.
    Widget(WidgetId),
}

/// Severity of a host notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum NotifyKind {
    Info,
    Warn,
    Error,
    Success,
}

/// Messages sent from the engine to the hosting page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MsgToHost {
    /// Soft, user-facing notice.
    Notify {
        /// Severity.
        kind: NotifyKind,
        /// Short title.
        title: String,
        /// Body text.
        text: String,
    },
    /// A save resolved successfully.
    Saved {
        /// Which save.
        scope: SaveScope,
        /// Issue sequence number of the save.
        seq: u64,
    },
    /// Edit mode changed.
    EditMode(bool),
}

/// Host channel helpers.
pub mod ipc {
    use super::MsgToHost;

    /// Tokio unbounded sender for host messages.
    pub type HostTx = tokio::sync::mpsc::UnboundedSender<MsgToHost>;
    /// Tokio unbounded receiver for host messages.
    pub type HostRx = tokio::sync::mpsc::UnboundedReceiver<MsgToHost>;

    /// Create a standard unbounded host channel (sender, receiver).
    pub fn host_channel() -> (HostTx, HostRx) {
        tokio::sync::mpsc::unbounded_channel::<MsgToHost>()
    }
}
