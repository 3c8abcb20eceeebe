use std::{fmt, str::FromStr};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Inferred input modality for the value in the barcode field.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProvenanceTag {
    #[default]
    Manual,
    Wedge,
    Camera,
}

impl ProvenanceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProvenanceTag::Manual => "manual",
            ProvenanceTag::Wedge => "wedge",
            ProvenanceTag::Camera => "camera",
        }
    }
}

impl fmt::Display for ProvenanceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProvenanceTag {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "manual" => Ok(ProvenanceTag::Manual),
            "wedge" => Ok(ProvenanceTag::Wedge),
            "camera" => Ok(ProvenanceTag::Camera),
            other => Err(anyhow!("unknown provenance tag '{other}'")),
        }
    }
}
