//! The scan form fields shared by the classifier, the camera loop and the page glue.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::provenance::ProvenanceTag;

/// What goes to the submission endpoint: the value plus how it was captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub barcode: String,
    pub title: String,
    pub source: ProvenanceTag,
}

/// Downstream submission trigger (the templating framework's form submit).
///
/// Fire and forget; lookup and batch insert happen on the server.
pub trait FormSubmitter: Send + Sync {
    fn request_submit(&self, submission: Submission);
}

#[derive(Debug, Clone, Default)]
struct FormFields {
    barcode: String,
    title: String,
    source: ProvenanceTag,
    barcode_selected: bool,
    /// A camera capture session is live and owns the source.
    camera_live: bool,
}

/// Cheap-to-clone handle onto the form fields.
#[derive(Debug, Clone, Default)]
pub struct ScanForm {
    fields: Arc<RwLock<FormFields>>,
}

impl ScanForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, FormFields> {
        self.fields.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, FormFields> {
        self.fields.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn barcode(&self) -> String {
        self.read().barcode.clone()
    }

    pub fn set_barcode(&self, value: impl Into<String>) {
        let mut guard = self.write();
        guard.barcode = value.into();
        guard.barcode_selected = false;
    }

    /// Select the whole barcode so the next scan overwrites it.
    pub fn select_barcode(&self) {
        self.write().barcode_selected = true;
    }

    pub fn is_barcode_selected(&self) -> bool {
        self.read().barcode_selected
    }

    pub fn title(&self) -> String {
        self.read().title.clone()
    }

    pub fn set_title(&self, value: impl Into<String>) {
        self.write().title = value.into();
    }

    pub fn source(&self) -> ProvenanceTag {
        self.read().source
    }

    pub fn set_source(&self, tag: ProvenanceTag) {
        self.write().source = tag;
    }

    /// Write `tag` unless a live camera session currently owns the source.
    ///
    /// Returns whether the tag was written. A `Camera` tag left behind by a
    /// finished session is overwritten like any other.
    pub fn set_source_unless_camera(&self, tag: ProvenanceTag) -> bool {
        let mut guard = self.write();
        if guard.camera_live {
            return false;
        }
        guard.source = tag;
        true
    }

    pub fn is_camera_live(&self) -> bool {
        self.read().camera_live
    }

    /// A camera session went live; the source is `Camera` until it ends.
    pub fn begin_camera_session(&self) {
        let mut guard = self.write();
        guard.camera_live = true;
        guard.source = ProvenanceTag::Camera;
    }

    /// The camera session ended. Without `reset_source` the `Camera` tag stays
    /// for the submission already in flight, until the next keyboard write.
    pub fn end_camera_session(&self, reset_source: bool) {
        let mut guard = self.write();
        guard.camera_live = false;
        if reset_source {
            guard.source = ProvenanceTag::Manual;
        }
    }

    pub fn snapshot(&self) -> Submission {
        let guard = self.read();
        Submission {
            barcode: guard.barcode.clone(),
            title: guard.title.clone(),
            source: guard.source,
        }
    }
}
