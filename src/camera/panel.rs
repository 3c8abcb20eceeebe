use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

pub const HINT_POINT_AT_BARCODE: &str = "Point the camera at a barcode.";
pub const HINT_UNSUPPORTED: &str =
    "Camera scanning is not supported in this browser. Use manual entry or a wedge scanner.";
pub const HINT_PERMISSION_DENIED: &str =
    "Camera permission denied or unavailable. Use manual entry or a wedge scanner.";
pub const HINT_TIMED_OUT: &str = "No barcode found. Try again or use manual entry.";

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PanelState {
    pub visible: bool,
    pub hint: String,
    /// Id of the stream attached to the video element, if any.
    pub video_source: Option<String>,
}

/// The camera panel: video surface plus hint line. Visible iff a session is
/// live or a hint needs showing.
#[derive(Debug, Clone, Default)]
pub struct CameraPanel {
    state: Arc<Mutex<PanelState>>,
}

impl CameraPanel {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_visible(&self, visible: bool) {
        self.lock().visible = visible;
    }

    pub fn show_hint(&self, hint: &str) {
        let mut guard = self.lock();
        guard.hint = hint.to_string();
        guard.visible = true;
    }

    pub fn set_hint(&self, hint: &str) {
        self.lock().hint = hint.to_string();
    }

    pub fn attach(&self, stream_id: &str) {
        self.lock().video_source = Some(stream_id.to_string());
    }

    pub fn detach(&self) {
        self.lock().video_source = None;
    }

    pub fn is_visible(&self) -> bool {
        self.lock().visible
    }

    pub fn snapshot(&self) -> PanelState {
        self.lock().clone()
    }
}
