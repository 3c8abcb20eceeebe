//! The scan page: routes host events to the capture components.

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;

use crate::{
    camera::{CameraController, CameraPanel, DetectorFactory, MediaDevices, StartOutcome},
    confirm::{
        intercept_click, intercept_confirm_hook, ClickDecision, ConfirmHookEvent, ConfirmModal,
        EventTrigger, HookDecision, ModalView,
    },
    error::CaptureError,
    form::{FormSubmitter, ScanForm},
    provenance::{InputKind, ProvenanceTag, WedgeInput},
    settings::ScanSettings,
    ui::{focus_barcode_if_idle, Element, ElementId, FocusHost, SCAN_RESULT},
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Capabilities the host page hands to the capture layer.
pub struct PagePlatform {
    pub media: Arc<dyn MediaDevices>,
    pub detectors: Arc<dyn DetectorFactory>,
    pub submitter: Arc<dyn FormSubmitter>,
    pub focus: Arc<dyn FocusHost>,
    pub modal_view: ModalView,
}

pub struct ScanPage {
    form: ScanForm,
    input: Mutex<WedgeInput>,
    camera: CameraController,
    modal: ConfirmModal,
    focus: Arc<dyn FocusHost>,
}

impl ScanPage {
    pub fn new(settings: &ScanSettings, platform: PagePlatform) -> Result<Self> {
        let form = ScanForm::new();
        let input = WedgeInput::new(settings.wedge.clone(), form.clone())?;
        let camera = CameraController::new(
            platform.media,
            platform.detectors,
            platform.submitter,
            platform.focus.clone(),
            form.clone(),
            CameraPanel::new(),
            settings.camera.clone(),
        );
        let modal = ConfirmModal::new(platform.modal_view, platform.focus.clone());

        Ok(Self {
            form,
            input: Mutex::new(input),
            camera,
            modal,
            focus: platform.focus,
        })
    }

    pub fn form(&self) -> &ScanForm {
        &self.form
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn modal(&self) -> &ConfirmModal {
        &self.modal
    }

    fn input(&self) -> MutexGuard<'_, WedgeInput> {
        self.input.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn on_barcode_focus(&self) {
        self.input().on_focus();
    }

    pub fn on_barcode_keydown(&self, key: &str, timestamp_ms: f64) {
        self.input().on_keydown(key, timestamp_ms);
    }

    /// `input_type` is the DOM `InputEvent.inputType`.
    pub fn on_barcode_input(&self, value: &str, input_type: &str) {
        self.input()
            .on_input(value, InputKind::from_input_type(input_type));
    }

    /// "Scan with camera" button. `None` when a session is already live.
    pub async fn on_camera_start(&self) -> Option<StartOutcome> {
        match self.camera.start().await {
            Ok(outcome) => Some(outcome),
            Err(CaptureError::AlreadyActive) => {
                log_debug!("camera already scanning; start ignored");
                None
            }
            Err(err) => {
                log_info!("camera start failed: {}", err);
                None
            }
        }
    }

    /// "Stop camera" button.
    pub async fn on_camera_stop(&self) {
        self.camera.stop(true).await;
    }

    /// The templating framework swapped new content into `target`.
    ///
    /// `added` is whether the swapped scan result reports a successful batch add.
    pub fn after_swap(&self, target: &ElementId, added: bool) {
        if target.as_str() != SCAN_RESULT {
            return;
        }

        focus_barcode_if_idle(self.focus.as_ref());
        self.form.set_source_unless_camera(ProvenanceTag::Manual);
        self.form.select_barcode();
        if added {
            self.form.set_title("");
        }
        self.input().reset();
    }

    pub fn on_page_show(&self) {
        focus_barcode_if_idle(self.focus.as_ref());
    }

    /// Window keydown. Returns `true` when the key was consumed.
    pub fn on_window_keydown(&self, key: &str) -> bool {
        self.modal.on_keydown(key)
    }

    pub fn on_confirm_hook(&self, event: ConfirmHookEvent) -> HookDecision {
        intercept_confirm_hook(&self.modal, event)
    }

    /// Capture-phase click anywhere on the page.
    pub fn on_click(&self, target: &Element, trigger: Arc<dyn EventTrigger>) -> ClickDecision {
        intercept_click(&self.modal, target, trigger)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::camera::testing::{
        barcode, FakeDetectors, FakeMedia, RecordingSubmitter, ScriptedDetector,
    };
    use crate::confirm::hooks::{CONFIRMED_EVENT, MARKER_ATTR, MESSAGE_ATTR, TRIGGER_ATTR};
    use crate::ui::{TrackedFocus, BARCODE_INPUT};

    struct Harness {
        page: ScanPage,
        focus: Arc<TrackedFocus>,
        submitter: Arc<RecordingSubmitter>,
    }

    fn harness(detector: Arc<ScriptedDetector>) -> Harness {
        let focus = Arc::new(TrackedFocus::new());
        let submitter = Arc::new(RecordingSubmitter::default());
        let page = ScanPage::new(
            &ScanSettings::default(),
            PagePlatform {
                media: Arc::new(FakeMedia::granting()),
                detectors: Arc::new(FakeDetectors::with(detector)),
                submitter: submitter.clone(),
                focus: focus.clone(),
                modal_view: ModalView::mounted(),
            },
        )
        .unwrap();
        Harness {
            page,
            focus,
            submitter,
        }
    }

    fn idle_page() -> Harness {
        harness(Arc::new(ScriptedDetector::default()))
    }

    fn scan_burst(page: &ScanPage, value: &str) {
        let mut typed = String::new();
        for (i, ch) in value.chars().enumerate() {
            page.on_barcode_keydown(&ch.to_string(), 1_000.0 + i as f64 * 10.0);
            typed.push(ch);
            page.on_barcode_input(&typed, "insertText");
        }
        page.on_barcode_keydown("Enter", 1_000.0 + value.len() as f64 * 10.0);
    }

    #[tokio::test]
    async fn wedge_burst_then_successful_swap_resets_for_next_scan() {
        let h = idle_page();
        h.page.on_barcode_focus();
        h.page.form().set_title("Dune");
        scan_burst(&h.page, "9780441172719");
        assert_eq!(h.page.form().source(), ProvenanceTag::Wedge);

        h.focus.focus(&ElementId::new("body")).unwrap();
        h.page.after_swap(&ElementId::new(SCAN_RESULT), true);

        assert_eq!(h.page.form().source(), ProvenanceTag::Manual);
        assert!(h.page.form().is_barcode_selected());
        assert_eq!(h.page.form().title(), "");
        assert_eq!(h.focus.active_element(), Some(ElementId::new(BARCODE_INPUT)));
    }

    #[tokio::test]
    async fn failed_add_keeps_title_and_other_swaps_are_ignored() {
        let h = idle_page();
        h.page.form().set_title("Dune");
        scan_burst(&h.page, "9780441172719");

        h.page.after_swap(&ElementId::new("batch-list"), true);
        assert_eq!(h.page.form().source(), ProvenanceTag::Wedge);
        assert_eq!(h.page.form().title(), "Dune");

        h.focus.focus(&ElementId::new("title")).unwrap();
        h.page.after_swap(&ElementId::new(SCAN_RESULT), false);
        assert_eq!(h.page.form().title(), "Dune");
        assert_eq!(h.page.form().source(), ProvenanceTag::Manual);
        assert_eq!(h.focus.active_element(), Some(ElementId::new("title")));
    }

    #[tokio::test]
    async fn pasted_digits_stay_manual() {
        let h = idle_page();
        h.page.on_barcode_input("9780441172719", "insertFromPaste");
        h.page.on_barcode_keydown("Enter", 5_000.0);
        assert_eq!(h.page.form().source(), ProvenanceTag::Manual);
    }

    #[tokio::test(start_paused = true)]
    async fn camera_scan_submits_and_swap_returns_to_manual() {
        let detector = Arc::new(ScriptedDetector::new(vec![
            Ok(Vec::new()),
            Ok(vec![barcode("4006381333931")]),
        ]));
        let h = harness(detector);

        assert_eq!(h.page.on_camera_start().await, Some(StartOutcome::Scanning));
        assert_eq!(h.page.on_camera_start().await, None);

        // Typing while the camera is live never takes the tag away from it.
        h.page.on_barcode_focus();
        h.page.on_barcode_input("12", "insertText");
        assert_eq!(h.page.form().source(), ProvenanceTag::Camera);

        tokio::time::sleep(Duration::from_millis(200)).await;
        let submitted = h.submitter.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].barcode, "4006381333931");
        assert_eq!(submitted[0].source, ProvenanceTag::Camera);

        h.page.after_swap(&ElementId::new(SCAN_RESULT), true);
        assert_eq!(h.page.form().source(), ProvenanceTag::Manual);
    }

    #[tokio::test(start_paused = true)]
    async fn camera_tag_clears_when_the_result_swap_never_arrives() {
        let detector = Arc::new(ScriptedDetector::new(vec![Ok(vec![barcode("4006381333931")])]));
        let h = harness(detector);

        h.page.on_camera_start().await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(h.submitter.submitted().len(), 1);
        assert!(!h.page.camera().is_active().await);
        assert_eq!(h.page.form().source(), ProvenanceTag::Camera);

        // The submission failed server-side; no scan-result swap follows.
        h.page.on_barcode_focus();
        h.page.on_barcode_keydown("Backspace", 10_000.0);
        h.page.on_barcode_input("", "deleteContentBackward");
        let mut typed = String::new();
        for (i, ch) in "12345678".chars().enumerate() {
            h.page.on_barcode_keydown(&ch.to_string(), 11_000.0 + i as f64 * 300.0);
            typed.push(ch);
            h.page.on_barcode_input(&typed, "insertText");
        }
        h.page.on_barcode_keydown("Enter", 14_000.0);

        assert_eq!(h.page.form().source(), ProvenanceTag::Manual);
    }

    #[tokio::test(start_paused = true)]
    async fn live_camera_tag_survives_a_swap() {
        let h = idle_page();
        h.page.on_camera_start().await;
        h.page.after_swap(&ElementId::new(SCAN_RESULT), false);
        assert_eq!(h.page.form().source(), ProvenanceTag::Camera);
        h.page.on_camera_stop().await;
        assert_eq!(h.page.form().source(), ProvenanceTag::Manual);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_button_resets_source_and_refocuses() {
        let h = idle_page();
        h.page.on_camera_start().await;
        h.focus.blur();

        h.page.on_camera_stop().await;

        assert!(!h.page.camera().is_active().await);
        assert_eq!(h.page.form().source(), ProvenanceTag::Manual);
        assert_eq!(h.focus.active_element(), Some(ElementId::new(BARCODE_INPUT)));
    }

    #[tokio::test]
    async fn page_show_focuses_only_when_idle() {
        let h = idle_page();
        h.page.on_page_show();
        assert_eq!(h.focus.active_element(), Some(ElementId::new(BARCODE_INPUT)));

        h.focus.focus(&ElementId::new("title")).unwrap();
        h.page.on_page_show();
        assert_eq!(h.focus.active_element(), Some(ElementId::new("title")));
    }

    #[derive(Default)]
    struct CountingTrigger {
        fired: Mutex<Vec<String>>,
    }

    impl EventTrigger for CountingTrigger {
        fn trigger(&self, _element: &ElementId, event: &str) {
            self.fired.lock().unwrap().push(event.to_string());
        }
    }

    #[tokio::test]
    async fn escape_dismisses_a_pending_click_confirmation() {
        let h = idle_page();
        let trigger = Arc::new(CountingTrigger::default());
        let button = Element::new("clear-batch")
            .with_attr(MARKER_ATTR, "1")
            .with_attr(MESSAGE_ATTR, "Clear the batch?")
            .with_attr(TRIGGER_ATTR, CONFIRMED_EVENT);

        assert_eq!(
            h.page.on_click(&button, trigger.clone()),
            ClickDecision::Intercepted
        );
        assert!(h.page.on_window_keydown("Escape"));
        assert!(!h.page.modal().is_pending());
        assert!(trigger.fired.lock().unwrap().is_empty());
        assert!(!h.page.on_window_keydown("Escape"));
    }
}
