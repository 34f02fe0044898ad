//! JSON snapshot files.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, SimError};

/// Write `value` as pretty JSON via a temp file and rename.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(SimError::Io)?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, json).map_err(SimError::Io)?;
    match std::fs::rename(&temp_path, path) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            std::fs::remove_file(path).map_err(SimError::Io)?;
            if let Err(err) = std::fs::rename(&temp_path, path) {
                let _ = std::fs::remove_file(&temp_path);
                return Err(SimError::Io(err));
            }
        }
        Err(err) => return Err(SimError::Io(err)),
    }
    Ok(())
}

/// Read a JSON snapshot. A missing file is reported as `NotFound`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(SimError::NotFound(path.display().to_string()));
    }
    let contents = std::fs::read_to_string(path).map_err(SimError::Io)?;
    Ok(serde_json::from_str(&contents)?)
}
