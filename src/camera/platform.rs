//! Platform capabilities the capture loop consumes: camera access and barcode detection.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CaptureError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BarcodeFormat {
    #[serde(rename = "ean_13")]
    Ean13,
    #[serde(rename = "ean_8")]
    Ean8,
    #[serde(rename = "upc_a")]
    UpcA,
    #[serde(rename = "upc_e")]
    UpcE,
    #[serde(rename = "code_128")]
    Code128,
}

impl BarcodeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            BarcodeFormat::Ean13 => "ean_13",
            BarcodeFormat::Ean8 => "ean_8",
            BarcodeFormat::UpcA => "upc_a",
            BarcodeFormat::UpcE => "upc_e",
            BarcodeFormat::Code128 => "code_128",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Back camera.
    #[default]
    Environment,
    User,
}

/// Video-only request; the facing mode is a preference, not a requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoConstraints {
    pub ideal_facing_mode: FacingMode,
    pub audio: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedBarcode {
    pub raw_value: String,
    pub format: Option<BarcodeFormat>,
}

pub trait MediaStream: Send + Sync {
    fn id(&self) -> &str;

    /// Halt every track of the stream. Must tolerate repeated calls.
    fn stop_tracks(&self);
}

#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// Fails with `CaptureError::PermissionDenied` when the camera is denied or missing.
    async fn get_user_media(
        &self,
        constraints: &VideoConstraints,
    ) -> Result<Arc<dyn MediaStream>, CaptureError>;
}

#[async_trait]
pub trait BarcodeDetector: Send + Sync {
    /// Look for barcodes in the stream's current frame.
    async fn detect(&self, source: &dyn MediaStream) -> Result<Vec<DetectedBarcode>, CaptureError>;
}

pub trait DetectorFactory: Send + Sync {
    fn is_supported(&self) -> bool;

    /// `None` asks for the platform's default formats.
    fn create(
        &self,
        formats: Option<&[BarcodeFormat]>,
    ) -> Result<Arc<dyn BarcodeDetector>, CaptureError>;
}
