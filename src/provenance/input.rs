use anyhow::Result;

use crate::form::ScanForm;

use super::{ClassifierState, ProvenanceTag, WedgeClassifier, WedgeConfig};

const ENABLE_LOGS: bool = false;

use crate::log_debug;

/// How an input event changed the field, from the DOM `inputType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Typing,
    Paste,
    Drop,
}

impl InputKind {
    pub fn from_input_type(input_type: &str) -> Self {
        match input_type {
            "insertFromPaste" => InputKind::Paste,
            "insertFromDrop" => InputKind::Drop,
            _ => InputKind::Typing,
        }
    }

    fn is_paste_or_drop(self) -> bool {
        matches!(self, InputKind::Paste | InputKind::Drop)
    }
}

/// Keyboard and input event policy for the barcode field.
///
/// Owns the classifier timing state and tags the shared form source. A live
/// camera session owns the source, so nothing here overwrites `Camera`.
pub struct WedgeInput {
    classifier: WedgeClassifier,
    state: ClassifierState,
    form: ScanForm,
}

impl WedgeInput {
    pub fn new(config: WedgeConfig, form: ScanForm) -> Result<Self> {
        let mut state = ClassifierState::new(config.ring_capacity);
        state.reset(form.barcode().trim());
        Ok(Self {
            classifier: WedgeClassifier::new(config)?,
            state,
            form,
        })
    }

    pub fn state(&self) -> &ClassifierState {
        &self.state
    }

    pub fn classifier(&self) -> &WedgeClassifier {
        &self.classifier
    }

    pub fn reset(&mut self) {
        self.state.reset(self.form.barcode().trim());
    }

    pub fn on_focus(&mut self) {
        self.reset();
        self.form.set_source_unless_camera(ProvenanceTag::Manual);
    }

    /// Handle a keydown. `key` follows DOM `KeyboardEvent.key` naming.
    pub fn on_keydown(&mut self, key: &str, timestamp_ms: f64) {
        let mut chars = key.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if ch.is_ascii_digit() {
                self.state.record_digit(ch, timestamp_ms);
            }
        }

        match key {
            "Backspace" | "Delete" => {
                self.form.set_source_unless_camera(ProvenanceTag::Manual);
                self.reset();
            }
            "Enter" => {
                // Many wedges send an Enter suffix; an earlier wedge verdict stands.
                let settled = match self.form.source() {
                    ProvenanceTag::Wedge => true,
                    ProvenanceTag::Camera => self.form.is_camera_live(),
                    ProvenanceTag::Manual => false,
                };
                if !settled {
                    let value = self.form.barcode();
                    let tag = self.classifier.classify(value.trim(), &self.state);
                    log_debug!("enter on '{}' classified as {}", value.trim(), tag);
                    self.form.set_source_unless_camera(tag);
                }
            }
            _ => {}
        }
    }

    /// Handle an input event carrying the field's new value.
    pub fn on_input(&mut self, raw_value: &str, kind: InputKind) {
        self.form.set_barcode(raw_value);
        let value = raw_value.trim();

        // A wedge never pastes or drops.
        if kind.is_paste_or_drop() {
            self.form.set_source_unless_camera(ProvenanceTag::Manual);
            self.state.reset(value);
            return;
        }

        let tag = self.classifier.classify(value, &self.state);
        self.form.set_source_unless_camera(tag);

        let current = value.chars().count();
        let previous = self.state.last_value().chars().count();
        let shrink_limit = self.classifier.config().shrink_reset_chars;
        if current == 0 || (previous > 0 && current + shrink_limit < previous) {
            log_debug!("barcode field cleared or cut from {} to {} chars", previous, current);
            self.state.reset(value);
        }
        self.state.set_last_value(value);
    }
}
