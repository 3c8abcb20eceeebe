use std::sync::{Arc, Mutex, MutexGuard};

use crate::ui::{ElementId, FocusHost};

use super::{
    state::{ConfirmState, ConfirmationRequest},
    view::{ModalView, OK_BUTTON, OVERLAY},
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

pub const DEFAULT_MESSAGE: &str = "Are you sure?";
pub const DEFAULT_CONFIRM_LABEL: &str = "OK";

/// Confirm-with-reason modal gating one destructive action at a time.
///
/// Idle until `request`; back to Idle on confirm, cancel, backdrop click or
/// Escape. Only confirm runs the action, and only confirm skips focus
/// restoration since its trigger is usually about to leave the page.
#[derive(Clone)]
pub struct ConfirmModal {
    state: Arc<Mutex<ConfirmState>>,
    view: ModalView,
    focus: Arc<dyn FocusHost>,
}

impl ConfirmModal {
    pub fn new(view: ModalView, focus: Arc<dyn FocusHost>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ConfirmState::Idle)),
            view,
            focus,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ConfirmState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn view(&self) -> &ModalView {
        &self.view
    }

    pub fn is_pending(&self) -> bool {
        self.lock().is_pending()
    }

    /// Show the modal for `on_confirm`. Returns whether it was shown.
    ///
    /// Not shown when the modal markup is missing or another request is
    /// pending; the action is then dropped unrun.
    pub fn request<F>(&self, message: Option<&str>, confirm_label: Option<&str>, on_confirm: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.view.is_mounted() {
            log_warn!("confirmation modal markup missing; action not issued");
            return false;
        }

        let mut state = self.lock();
        if state.is_pending() {
            log_warn!("confirmation already pending; ignoring second request");
            return false;
        }

        let message = non_empty(message).unwrap_or(DEFAULT_MESSAGE).to_string();
        let confirm_label = non_empty(confirm_label)
            .unwrap_or(DEFAULT_CONFIRM_LABEL)
            .to_string();

        {
            let mut view = self.view.lock();
            view.message = message.clone();
            view.ok_label = confirm_label.clone();
            view.hidden = false;
        }

        *state = ConfirmState::Pending(ConfirmationRequest {
            message,
            confirm_label,
            on_confirm: Some(Box::new(on_confirm)),
            previously_focused: self.focus.active_element(),
        });
        drop(state);

        self.focus_quietly(&ElementId::new(OK_BUTTON));
        true
    }

    /// OK button. Disables both controls, runs the action once, hides.
    pub fn confirm(&self) {
        let action = match &mut *self.lock() {
            ConfirmState::Pending(request) => request.on_confirm.take(),
            ConfirmState::Idle => None,
        };

        let Some(action) = action else {
            self.hide(true);
            return;
        };

        {
            let mut view = self.view.lock();
            view.ok_disabled = true;
            view.cancel_disabled = true;
        }

        // Hides even if the action panics.
        let _hide = HideOnDrop(self);
        action();
    }

    /// Cancel button.
    pub fn cancel(&self) {
        self.hide(true);
    }

    /// Click anywhere on the overlay; only the dimmed backdrop itself dismisses.
    pub fn on_overlay_click(&self, target: &ElementId) {
        if target.as_str() == OVERLAY {
            self.hide(true);
        }
    }

    /// Window keydown. Returns `true` when the key was consumed.
    pub fn on_keydown(&self, key: &str) -> bool {
        if key != "Escape" || !self.is_pending() {
            return false;
        }
        self.hide(true);
        true
    }

    fn hide(&self, restore_focus: bool) {
        let previous = std::mem::take(&mut *self.lock());

        {
            let mut view = self.view.lock();
            view.hidden = true;
            view.ok_disabled = false;
            view.cancel_disabled = false;
        }

        if let ConfirmState::Pending(request) = previous {
            log_debug!("confirmation '{}' closed", request.message);
            if restore_focus {
                if let Some(element) = request.previously_focused.as_ref() {
                    self.focus_quietly(element);
                }
            }
        }
    }

    fn focus_quietly(&self, element: &ElementId) {
        if let Err(err) = self.focus.focus(element) {
            log_debug!("could not focus {}: {:#}", element, err);
        }
    }
}

struct HideOnDrop<'a>(&'a ConfirmModal);

impl Drop for HideOnDrop<'_> {
    fn drop(&mut self) {
        self.0.hide(false);
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
