use std::result::Result as StdResult;

use thiserror::Error;
use tilegrid_ids::WidgetId;
use tilegrid_protocol::codec;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the tilegrid engine.
///
/// Collisions and edit-mode races are not errors; they are ordinary
/// gesture outcomes reported through [`crate::Effect`].
#[derive(Debug, Error)]
pub enum Error {
    /// A widget id that is not part of the current layout.
    #[error("unknown widget: {0}")]
    UnknownWidget(WidgetId),

    /// The same id appeared twice in a loaded layout.
    #[error("duplicate widget in layout: {0}")]
    DuplicateWidget(WidgetId),

    /// The save request never got a usable reply.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend replied but refused the save.
    #[error("save rejected: {}", .0.as_deref().unwrap_or("no reason given"))]
    Rejected(Option<String>),

    /// Encoding or decoding a wire payload failed.
    #[error("codec error: {0}")]
    Codec(#[from] codec::Error),

    /// A save was issued with no Tokio runtime to run it on.
    #[error("no async runtime available to run the save")]
    NoRuntime,

    /// The host message channel has been closed by the receiver.
    #[error("host channel closed")]
    ChannelClosed,
}
