//! Fake platform capabilities for camera tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;

use crate::{
    error::CaptureError,
    form::{FormSubmitter, Submission},
};

use super::platform::{
    BarcodeDetector, BarcodeFormat, DetectedBarcode, DetectorFactory, MediaDevices, MediaStream,
    VideoConstraints,
};

#[derive(Default)]
pub struct FakeStream {
    pub stopped: AtomicBool,
    pub stop_calls: AtomicUsize,
}

impl MediaStream for FakeStream {
    fn id(&self) -> &str {
        "fake-stream"
    }

    fn stop_tracks(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct FakeMedia {
    pub stream: Arc<FakeStream>,
    pub deny: bool,
    pub requests: Mutex<Vec<VideoConstraints>>,
}

impl FakeMedia {
    pub fn granting() -> Self {
        Self {
            stream: Arc::new(FakeStream::default()),
            deny: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn denying() -> Self {
        Self {
            deny: true,
            ..Self::granting()
        }
    }
}

#[async_trait]
impl MediaDevices for FakeMedia {
    async fn get_user_media(
        &self,
        constraints: &VideoConstraints,
    ) -> Result<Arc<dyn MediaStream>, CaptureError> {
        self.requests.lock().unwrap().push(constraints.clone());
        if self.deny {
            return Err(CaptureError::PermissionDenied("NotAllowedError".into()));
        }
        Ok(self.stream.clone())
    }
}

/// Plays back one scripted result per frame, then reports nothing.
#[derive(Default)]
pub struct ScriptedDetector {
    pub script: Mutex<VecDeque<Result<Vec<DetectedBarcode>, CaptureError>>>,
    pub calls: AtomicUsize,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Result<Vec<DetectedBarcode>, CaptureError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BarcodeDetector for ScriptedDetector {
    async fn detect(&self, _source: &dyn MediaStream) -> Result<Vec<DetectedBarcode>, CaptureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub fn barcode(value: &str) -> DetectedBarcode {
    DetectedBarcode {
        raw_value: value.to_string(),
        format: Some(BarcodeFormat::Ean13),
    }
}

pub struct FakeDetectors {
    pub supported: bool,
    pub reject_preferred: bool,
    pub detector: Arc<ScriptedDetector>,
    pub created_with: Mutex<Vec<Option<Vec<BarcodeFormat>>>>,
}

impl FakeDetectors {
    pub fn with(detector: Arc<ScriptedDetector>) -> Self {
        Self {
            supported: true,
            reject_preferred: false,
            detector,
            created_with: Mutex::new(Vec::new()),
        }
    }
}

impl DetectorFactory for FakeDetectors {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn create(
        &self,
        formats: Option<&[BarcodeFormat]>,
    ) -> Result<Arc<dyn BarcodeDetector>, CaptureError> {
        self.created_with
            .lock()
            .unwrap()
            .push(formats.map(|f| f.to_vec()));
        if formats.is_some() && self.reject_preferred {
            return Err(CaptureError::Unsupported);
        }
        Ok(self.detector.clone())
    }
}

#[derive(Default)]
pub struct RecordingSubmitter {
    pub submissions: Mutex<Vec<Submission>>,
}

impl RecordingSubmitter {
    pub fn submitted(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }
}

impl FormSubmitter for RecordingSubmitter {
    fn request_submit(&self, submission: Submission) {
        self.submissions.lock().unwrap().push(submission);
    }
}
