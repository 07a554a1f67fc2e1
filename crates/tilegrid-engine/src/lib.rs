//! Tilegrid Engine
//!
//! The engine turns pointer gestures on a snapped widget grid into layout
//! changes:
//! - keeps the authoritative widget rectangles for one view ([`LayoutStore`])
//! - runs the single-gesture state machine ([`InteractionController`])
//! - issues optimistic, fire-and-forget saves ([`PersistenceGateway`])
//! - reports save failures and edit-mode changes to the host page
//!
//! Most hosts only need [`EditorView`], which owns all of the above for one
//! view. Rendering stays outside the engine behind [`GhostRenderer`], and the
//! backend transport behind [`LayoutGateway`].
//!
//! Gesture logic is synchronous. Only saves run on the Tokio runtime; a
//! save issued outside one fails and is reported like any other failed save.

mod edit_mode;
mod error;
mod gesture;
mod ghost;
mod interaction;
mod notification;
mod persistence;
mod store;
mod view;

#[cfg(any(test, feature = "test-utils"))]
#[allow(missing_docs, clippy::missing_docs_in_private_items)]
pub mod test_support;

pub use edit_mode::EditMode;
pub use error::{Error, Result};
pub use gesture::{GestureKind, Handle, PointerPos};
pub use ghost::{GhostFrame, GhostRenderer, NoopGhost};
pub use interaction::{
    Effect, GestureCtx, InteractionController, InteractionState, NoopReason, Phase, RevertReason,
    Transition,
};
pub use notification::NotificationDispatcher;
pub use persistence::{LayoutGateway, PersistenceGateway, SaveOutcome, SaveStatus};
pub use store::LayoutStore;
pub use view::EditorView;
