//! Barcode capture for the scan page: wedge/camera/manual provenance, camera
//! capture, the confirmation modal and the offline app-shell cache.

pub mod cache;
pub mod camera;
pub mod confirm;
pub mod db;
pub mod error;
pub mod form;
pub mod page;
pub mod provenance;
pub mod settings;
pub mod ui;
pub mod utils;

pub use error::{CacheError, CaptureError};
pub use form::{FormSubmitter, ScanForm, Submission};
pub use page::{PagePlatform, ScanPage};
pub use provenance::ProvenanceTag;
pub use settings::{ScanSettings, SettingsStore};
pub use utils::init_logging;
