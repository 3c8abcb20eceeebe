use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::platform::{BarcodeFormat, FacingMode};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Formats asked of the detector first; platform defaults are the fallback.
    pub preferred_formats: Vec<BarcodeFormat>,
    pub facing_mode: FacingMode,
    /// One display frame.
    pub frame_interval_ms: u64,
    /// Give up after this long without a detection. `None` scans until stopped.
    pub scan_timeout_ms: Option<u64>,
}

impl CameraConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    pub fn scan_timeout(&self) -> Option<Duration> {
        self.scan_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            preferred_formats: vec![
                BarcodeFormat::Ean13,
                BarcodeFormat::Ean8,
                BarcodeFormat::UpcA,
                BarcodeFormat::UpcE,
                BarcodeFormat::Code128,
            ],
            facing_mode: FacingMode::Environment,
            frame_interval_ms: 16,
            scan_timeout_ms: None,
        }
    }
}
