//! Interception of the templating framework's confirm paths.
//!
//! Two paths reach the modal. The framework's confirm-before-request hook
//! carries a question and a way to resume the request. Separately, buttons
//! whose request waits for a synthetic `confirmed` event are intercepted on
//! click. Both only act on elements opted in with `data-confirm-modal="1"`.

use std::{fmt, sync::Arc};

use crate::ui::{Element, ElementId};

use super::ConfirmModal;

pub const MARKER_ATTR: &str = "data-confirm-modal";
pub const MESSAGE_ATTR: &str = "data-confirm-message";
pub const CONFIRM_LABEL_ATTR: &str = "data-confirm-ok";
pub const TRIGGER_ATTR: &str = "hx-trigger";
pub const CONFIRMED_EVENT: &str = "confirmed";

/// Resumes the held request. `true` skips the framework's native confirm.
pub type IssueRequest = Box<dyn FnOnce(bool) + Send + 'static>;

/// Programmatic "trigger named event on element" capability of the framework.
pub trait EventTrigger: Send + Sync {
    fn trigger(&self, element: &ElementId, event: &str);
}

/// Payload of the framework's confirm-before-request hook.
pub struct ConfirmHookEvent {
    pub target: Option<Element>,
    pub question: Option<String>,
    pub issue_request: IssueRequest,
}

impl fmt::Debug for ConfirmHookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmHookEvent")
            .field("target", &self.target.as_ref().map(|el| &el.id))
            .field("question", &self.question)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookDecision {
    /// Not ours; the framework proceeds with its own confirmation.
    Ignored,
    /// Native confirmation suppressed. `shown` is false when the modal could
    /// not be displayed, in which case the request is never issued.
    Intercepted { shown: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDecision {
    PassThrough,
    /// Default prevented and propagation stopped.
    Intercepted,
}

fn is_opted_in(element: &Element) -> bool {
    element.attr(MARKER_ATTR) == Some("1")
}

/// Handle the confirm-before-request hook.
pub fn intercept_confirm_hook(modal: &ConfirmModal, event: ConfirmHookEvent) -> HookDecision {
    let ConfirmHookEvent {
        target,
        question,
        issue_request,
    } = event;

    let Some(target) = target else {
        return HookDecision::Ignored;
    };
    let element = target.closest(is_opted_in).unwrap_or(&target);
    if !is_opted_in(element) {
        return HookDecision::Ignored;
    }

    // No question means the element has no confirm configured.
    let Some(question) = question.filter(|q| !q.is_empty()) else {
        return HookDecision::Ignored;
    };

    let shown = modal.request(
        Some(&question),
        element.attr(CONFIRM_LABEL_ATTR),
        move || issue_request(true),
    );
    HookDecision::Intercepted { shown }
}

/// Handle a click in the capture phase.
pub fn intercept_click(
    modal: &ConfirmModal,
    target: &Element,
    trigger: Arc<dyn EventTrigger>,
) -> ClickDecision {
    let Some(element) =
        target.closest(|el| is_opted_in(el) && el.attr(MESSAGE_ATTR).is_some())
    else {
        return ClickDecision::PassThrough;
    };

    // Only elements whose request waits on the synthetic event.
    let waits_for_confirmed = element
        .attr(TRIGGER_ATTR)
        .map(|spec| spec.contains(CONFIRMED_EVENT))
        .unwrap_or(false);
    if !waits_for_confirmed {
        return ClickDecision::PassThrough;
    }

    let element_id = element.id.clone();
    modal.request(
        element.attr(MESSAGE_ATTR),
        element.attr(CONFIRM_LABEL_ATTR),
        move || trigger.trigger(&element_id, CONFIRMED_EVENT),
    );
    ClickDecision::Intercepted
}
