use tilegrid_protocol::{MsgToHost, NotifyKind, SaveScope, ipc::HostTx};
use tracing::info;

use crate::{Error, Result};

/// Sends notices and save confirmations to the hosting page.
#[derive(Clone, Debug)]
pub struct NotificationDispatcher {
    /// Host channel.
    tx: HostTx,
}

impl NotificationDispatcher {
    /// Create a new dispatcher from a host message channel.
    pub fn new(tx: HostTx) -> Self {
        Self { tx }
    }

    /// Send a notification with the given kind, title, and text.
    pub fn send_notification(&self, kind: NotifyKind, title: String, text: String) -> Result<()> {
        info!(kind = ?kind, title = %title, text = %text, "notification_display");
        self.send(MsgToHost::Notify { kind, title, text })
    }

    /// Convenience helper for a warning notice.
    pub fn send_warn(&self, title: &str, text: String) -> Result<()> {
        self.send_notification(NotifyKind::Warn, title.to_string(), text)
    }

    /// Report a save that resolved successfully.
    pub fn send_saved(&self, scope: SaveScope, seq: u64) -> Result<()> {
        self.send(MsgToHost::Saved { scope, seq })
    }

    /// Report an edit mode change.
    pub fn send_edit_mode(&self, enabled: bool) -> Result<()> {
        self.send(MsgToHost::EditMode(enabled))
    }

    /// Push one message onto the host channel.
    fn send(&self, msg: MsgToHost) -> Result<()> {
        self.tx.send(msg).map_err(|_| Error::ChannelClosed)
    }
}
