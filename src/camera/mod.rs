pub mod config;
pub mod controller;
pub mod loop_worker;
pub mod panel;
pub mod platform;

#[cfg(test)]
pub(crate) mod testing;

pub use config::CameraConfig;
pub use controller::{CameraController, StartOutcome};
pub use panel::{CameraPanel, PanelState};
pub use platform::{
    BarcodeDetector, BarcodeFormat, DetectedBarcode, DetectorFactory, FacingMode, MediaDevices,
    MediaStream, VideoConstraints,
};
