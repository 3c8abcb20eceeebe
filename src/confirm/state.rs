use std::fmt;

use crate::ui::ElementId;

/// The gated action, run at most once.
pub type ConfirmAction = Box<dyn FnOnce() + Send + 'static>;

pub struct ConfirmationRequest {
    pub message: String,
    pub confirm_label: String,
    /// Taken when the user confirms.
    pub(super) on_confirm: Option<ConfirmAction>,
    /// Focus to give back on cancel or dismiss.
    pub previously_focused: Option<ElementId>,
}

impl fmt::Debug for ConfirmationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationRequest")
            .field("message", &self.message)
            .field("confirm_label", &self.confirm_label)
            .field("has_action", &self.on_confirm.is_some())
            .field("previously_focused", &self.previously_focused)
            .finish()
    }
}

#[derive(Debug, Default)]
pub enum ConfirmState {
    #[default]
    Idle,
    Pending(ConfirmationRequest),
}

impl ConfirmState {
    pub fn is_pending(&self) -> bool {
        matches!(self, ConfirmState::Pending(_))
    }
}
