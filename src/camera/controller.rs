use std::sync::Arc;

use log::info;
use tokio::{sync::Mutex, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    error::CaptureError,
    form::{FormSubmitter, ScanForm},
    ui::{focus_barcode_if_idle, FocusHost},
};

use super::{
    loop_worker::scan_loop,
    panel::{
        CameraPanel, HINT_PERMISSION_DENIED, HINT_POINT_AT_BARCODE, HINT_TIMED_OUT,
        HINT_UNSUPPORTED,
    },
    platform::{BarcodeDetector, DetectorFactory, MediaDevices, MediaStream, VideoConstraints},
    CameraConfig,
};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// How a `start` request ended. Failures are already on the panel as a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Scanning,
    Unsupported,
    PermissionDenied,
}

struct CaptureSession {
    id: Uuid,
    stream: Arc<dyn MediaStream>,
    cancel_token: CancellationToken,
}

struct ControllerInner {
    media: Arc<dyn MediaDevices>,
    detectors: Arc<dyn DetectorFactory>,
    submitter: Arc<dyn FormSubmitter>,
    focus: Arc<dyn FocusHost>,
    form: ScanForm,
    panel: CameraPanel,
    config: CameraConfig,
    session: Mutex<Option<CaptureSession>>,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

/// Owns at most one live camera capture session.
#[derive(Clone)]
pub struct CameraController {
    inner: Arc<ControllerInner>,
}

impl CameraController {
    pub fn new(
        media: Arc<dyn MediaDevices>,
        detectors: Arc<dyn DetectorFactory>,
        submitter: Arc<dyn FormSubmitter>,
        focus: Arc<dyn FocusHost>,
        form: ScanForm,
        panel: CameraPanel,
        config: CameraConfig,
    ) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                media,
                detectors,
                submitter,
                focus,
                form,
                panel,
                config,
                session: Mutex::new(None),
                loop_handle: Mutex::new(None),
            }),
        }
    }

    pub fn panel(&self) -> &CameraPanel {
        &self.inner.panel
    }

    pub fn config(&self) -> &CameraConfig {
        &self.inner.config
    }

    pub async fn is_active(&self) -> bool {
        self.inner.session.lock().await.is_some()
    }

    pub async fn session_id(&self) -> Option<Uuid> {
        self.inner.session.lock().await.as_ref().map(|session| session.id)
    }

    /// Acquire the camera and begin polling for a barcode.
    ///
    /// Unsupported platforms and denied cameras are reported on the panel and
    /// returned as an outcome. Starting while a session is live is rejected
    /// with `CaptureError::AlreadyActive` and leaves that session untouched.
    pub async fn start(&self) -> Result<StartOutcome, CaptureError> {
        let mut session_guard = self.inner.session.lock().await;
        if session_guard.is_some() {
            return Err(CaptureError::AlreadyActive);
        }

        let detector = match self.build_detector() {
            Ok(detector) => detector,
            Err(err) => {
                log_warn!("camera scanning unavailable: {err}");
                self.inner.panel.show_hint(HINT_UNSUPPORTED);
                return Ok(StartOutcome::Unsupported);
            }
        };

        let constraints = VideoConstraints {
            ideal_facing_mode: self.inner.config.facing_mode,
            audio: false,
        };
        let stream = match self.inner.media.get_user_media(&constraints).await {
            Ok(stream) => stream,
            Err(err) => {
                log_warn!("camera acquisition failed: {err}");
                self.inner.panel.show_hint(HINT_PERMISSION_DENIED);
                return Ok(StartOutcome::PermissionDenied);
            }
        };

        let session_id = Uuid::new_v4();
        let cancel_token = CancellationToken::new();

        self.inner.panel.attach(stream.id());
        self.inner.panel.set_visible(true);
        self.inner.form.begin_camera_session();
        self.inner.panel.set_hint(HINT_POINT_AT_BARCODE);

        *session_guard = Some(CaptureSession {
            id: session_id,
            stream: Arc::clone(&stream),
            cancel_token: cancel_token.clone(),
        });
        drop(session_guard);

        let handle = tokio::spawn(scan_loop(
            self.clone(),
            session_id,
            detector,
            stream,
            cancel_token,
        ));
        if let Some(previous) = self.inner.loop_handle.lock().await.replace(handle) {
            // Loop of an already finished session.
            previous.abort();
        }

        log_info!("camera session {} started", session_id);
        Ok(StartOutcome::Scanning)
    }

    /// Tear down the live session, if any, and wait for its loop to exit.
    ///
    /// Idempotent. With `reset_source` the form source goes back to `Manual`.
    pub async fn stop(&self, reset_source: bool) {
        let session = self.inner.session.lock().await.take();
        self.teardown(session, reset_source);

        let handle = self.inner.loop_handle.lock().await.take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                if !err.is_cancelled() {
                    log_warn!("camera loop task failed to join: {err}");
                }
            }
        }
    }

    fn build_detector(&self) -> Result<Arc<dyn BarcodeDetector>, CaptureError> {
        let detectors = &self.inner.detectors;
        if !detectors.is_supported() {
            return Err(CaptureError::Unsupported);
        }

        match detectors.create(Some(self.inner.config.preferred_formats.as_slice())) {
            Ok(detector) => Ok(detector),
            Err(err) => {
                info!("preferred barcode formats rejected ({err}); using platform defaults");
                detectors.create(None)
            }
        }
    }

    /// Called by the scan loop with the first detected value.
    ///
    /// The value is written and submitted only while `session_id` is still the
    /// live session; the session then ends with the camera source preserved.
    pub(super) async fn complete(&self, session_id: Uuid, value: String) {
        let session = {
            let mut guard = self.inner.session.lock().await;
            if guard.as_ref().map(|session| session.id) != Some(session_id) {
                return;
            }
            self.inner.form.set_barcode(value.as_str());
            self.inner.submitter.request_submit(self.inner.form.snapshot());
            guard.take()
        };

        log_info!("camera session {} detected '{}'", session_id, value);
        self.teardown(session, false);
    }

    /// Called by the scan loop when the configured scan timeout elapses.
    pub(super) async fn expire(&self, session_id: Uuid) {
        let session = {
            let mut guard = self.inner.session.lock().await;
            if guard.as_ref().map(|session| session.id) != Some(session_id) {
                return;
            }
            guard.take()
        };

        log_info!("camera session {} timed out", session_id);
        self.teardown(session, true);
        self.inner.panel.show_hint(HINT_TIMED_OUT);
    }

    fn teardown(&self, session: Option<CaptureSession>, reset_source: bool) {
        if let Some(session) = session {
            session.cancel_token.cancel();
            session.stream.stop_tracks();
            log_info!("camera session {} stopped", session.id);
        }

        self.inner.panel.detach();
        self.inner.panel.set_visible(false);
        self.inner.form.end_camera_session(reset_source);
        focus_barcode_if_idle(self.inner.focus.as_ref());
    }
}
