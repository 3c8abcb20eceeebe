use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{cache::CacheConfig, camera::CameraConfig, provenance::WedgeConfig};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanSettings {
    pub wedge: WedgeConfig,
    pub camera: CameraConfig,
    pub cache: CacheConfig,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<ScanSettings>,
}

impl SettingsStore {
    /// Load from `path`, falling back to defaults when the file is missing or unreadable JSON.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!("ignoring malformed settings in {}: {}", path.display(), err);
                ScanSettings::default()
            })
        } else {
            ScanSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> RwLockReadGuard<'_, ScanSettings> {
        self.data.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ScanSettings> {
        self.data.write().unwrap_or_else(|p| p.into_inner())
    }

    pub fn get(&self) -> ScanSettings {
        self.read().clone()
    }

    pub fn wedge(&self) -> WedgeConfig {
        self.read().wedge.clone()
    }

    pub fn camera(&self) -> CameraConfig {
        self.read().camera.clone()
    }

    pub fn cache(&self) -> CacheConfig {
        self.read().cache.clone()
    }

    /// Apply `change` and write the result to disk.
    pub fn update<F>(&self, change: F) -> Result<ScanSettings>
    where
        F: FnOnce(&mut ScanSettings),
    {
        let mut guard = self.write();
        let mut next = guard.clone();
        change(&mut next);
        self.persist(&next)?;
        *guard = next.clone();
        Ok(next)
    }

    fn persist(&self, data: &ScanSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: ScanSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed settings in {}", self.path.display()))?;
        *self.write() = data;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.get(), ScanSettings::default());
        assert_eq!(store.cache().generation, "cdx-web-scan-v7");
    }

    #[test]
    fn update_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        store
            .update(|s| {
                s.wedge.max_avg_interval_ms = 50.0;
                s.camera.scan_timeout_ms = Some(30_000);
            })
            .unwrap();

        let reopened = SettingsStore::new(path).unwrap();
        assert_eq!(reopened.wedge().max_avg_interval_ms, 50.0);
        assert_eq!(reopened.camera().scan_timeout_ms, Some(30_000));
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "wedge": { "min_digits": 12 } }"#).unwrap();

        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.wedge().min_digits, 12);
        assert_eq!(store.wedge().max_digits, 14);
        assert_eq!(store.camera(), CameraConfig::default());
    }

    #[test]
    fn malformed_file_falls_back_but_reload_reports_it() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.get(), ScanSettings::default());
        assert!(store.reload().is_err());
    }

    #[test]
    fn reload_picks_up_external_edits() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();
        store.update(|_| {}).unwrap();

        let mut edited = store.get();
        edited.cache.generation = "cdx-web-scan-v8".into();
        fs::write(&path, serde_json::to_string(&edited).unwrap()).unwrap();

        store.reload().unwrap();
        assert_eq!(store.cache().generation, "cdx-web-scan-v8");
    }
}
