use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Shared "layout is editable" flag.
///
/// Cloning yields another handle to the same flag, so the page's edit/save
/// toggle and the gesture controller always agree. Gestures may only start
/// while the flag is set; clearing it mid-gesture makes the gesture revert
/// on release.
#[derive(Clone, Debug, Default)]
pub struct EditMode {
    /// Current value.
    flag: Arc<AtomicBool>,
}

impl EditMode {
    /// New flag with the given initial value.
    pub fn new(enabled: bool) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(enabled)),
        }
    }

    /// True when the layout is editable.
    pub fn is_enabled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Set the flag, returning the previous value.
    pub fn set(&self, enabled: bool) -> bool {
        self.flag.swap(enabled, Ordering::SeqCst)
    }
}
