//! JSON world and save files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use hideout_domain::{HideoutError, HideoutSnapshot};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::infrastructure::memory::WorldFile;

#[derive(Debug, Error)]
pub enum SaveFileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed save data in {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Hideout(#[from] HideoutError),
}

impl SaveFileError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn serialization(path: &Path, source: serde_json::Error) -> Self {
        Self::Serialization {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Load a world file. Duplicate hideout ids are rejected here, before any
/// session sees them.
pub fn read_world(path: &Path) -> Result<WorldFile, SaveFileError> {
    let world: WorldFile = read_json(path)?;
    check_unique_ids(&world.hideouts)?;
    tracing::info!(
        path = ?path,
        locations = world.locations.len(),
        hideouts = world.hideouts.hideouts.len(),
        "World file loaded"
    );
    Ok(world)
}

pub fn write_world(path: &Path, world: &WorldFile) -> Result<(), SaveFileError> {
    write_json(path, world)?;
    tracing::info!(path = ?path, "World file saved");
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<HideoutSnapshot, SaveFileError> {
    let snapshot: HideoutSnapshot = read_json(path)?;
    check_unique_ids(&snapshot)?;
    Ok(snapshot)
}

pub fn write_snapshot(path: &Path, snapshot: &HideoutSnapshot) -> Result<(), SaveFileError> {
    write_json(path, snapshot)?;
    tracing::info!(
        path = ?path,
        hideouts = snapshot.hideouts.len(),
        "Hideout snapshot saved"
    );
    Ok(())
}

fn check_unique_ids(snapshot: &HideoutSnapshot) -> Result<(), HideoutError> {
    let mut seen = HashSet::new();
    for hideout in &snapshot.hideouts {
        if !seen.insert(hideout.id()) {
            return Err(HideoutError::DuplicateRegistration(hideout.id().clone()));
        }
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SaveFileError> {
    let raw = fs::read_to_string(path).map_err(|e| SaveFileError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|e| SaveFileError::serialization(path, e))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SaveFileError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SaveFileError::io(parent, e))?;
    }
    let json =
        serde_json::to_string_pretty(value).map_err(|e| SaveFileError::serialization(path, e))?;
    fs::write(path, json).map_err(|e| SaveFileError::io(path, e))
}
