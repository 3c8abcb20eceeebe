use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

pub const OVERLAY: &str = "confirm-modal";
pub const MESSAGE: &str = "confirm-message";
pub const CANCEL_BUTTON: &str = "confirm-cancel";
pub const OK_BUTTON: &str = "confirm-ok";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModalViewState {
    /// Overlay, message, cancel and OK elements all exist on the page.
    pub mounted: bool,
    pub hidden: bool,
    pub message: String,
    pub ok_label: String,
    pub ok_disabled: bool,
    pub cancel_disabled: bool,
}

/// Rendered state of the confirmation overlay.
#[derive(Debug, Clone)]
pub struct ModalView {
    state: Arc<Mutex<ModalViewState>>,
}

impl ModalView {
    pub fn mounted() -> Self {
        Self::with_mounted(true)
    }

    /// A page without the modal markup; requests are never shown.
    pub fn unmounted() -> Self {
        Self::with_mounted(false)
    }

    fn with_mounted(mounted: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(ModalViewState {
                mounted,
                hidden: true,
                message: String::new(),
                ok_label: String::new(),
                ok_disabled: false,
                cancel_disabled: false,
            })),
        }
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, ModalViewState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> ModalViewState {
        self.lock().clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.lock().mounted
    }

    pub fn is_hidden(&self) -> bool {
        self.lock().hidden
    }

    pub fn controls_disabled(&self) -> (bool, bool) {
        let guard = self.lock();
        (guard.ok_disabled, guard.cancel_disabled)
    }
}
