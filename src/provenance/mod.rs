pub mod classifier;
pub mod config;
pub mod input;
pub mod state;
pub mod tag;

pub use classifier::WedgeClassifier;
pub use config::WedgeConfig;
pub use input::{InputKind, WedgeInput};
pub use state::{ClassifierState, KeystrokeEvent};
pub use tag::ProvenanceTag;
