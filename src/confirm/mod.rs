pub mod hooks;
pub mod modal;
pub mod state;
pub mod view;

pub use hooks::{
    intercept_click, intercept_confirm_hook, ClickDecision, ConfirmHookEvent, EventTrigger,
    HookDecision, IssueRequest,
};
pub use modal::ConfirmModal;
pub use state::{ConfirmAction, ConfirmState, ConfirmationRequest};
pub use view::{ModalView, ModalViewState};
