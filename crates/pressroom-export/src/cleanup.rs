//! Deletion of generated artifacts.
//!
//! Deletion stops at the first failure: files listed after a missing or
//! undeletable one are left alone, and "already gone" is reported like any
//! other I/O error.

use std::fs;
use std::path::Path;

use pressroom_core::paths::{absolute_temp_path, is_plain_file_name};
use pressroom_core::settings::Environment;

use crate::error::ExportError;
use crate::pdf::Artifacts;

/// Delete `names` from the temp directory, resolved against the absolute
/// current working directory.
pub fn remove_files<S: AsRef<str>>(environment: Environment, names: &[S]) -> Result<(), ExportError> {
    let cwd = std::env::current_dir().map_err(|e| ExportError::io(".", e))?;
    remove_files_in(&absolute_temp_path(environment, &cwd), names)
}

/// Delete `names` from `dir`, in order.
pub fn remove_files_in<S: AsRef<str>>(dir: &Path, names: &[S]) -> Result<(), ExportError> {
    for name in names {
        let name = name.as_ref();
        if !is_plain_file_name(name) {
            return Err(ExportError::InvalidFileName(name.to_string()));
        }
        remove(&dir.join(name))?;
    }
    Ok(())
}

impl Artifacts {
    /// Delete every file of this generation session.
    pub fn release(&self) -> Result<(), ExportError> {
        for path in self.paths() {
            remove(path)?;
        }
        Ok(())
    }
}

fn remove(path: &Path) -> Result<(), ExportError> {
    fs::remove_file(path).map_err(|e| ExportError::io(path, e))?;
    tracing::debug!(path = %path.display(), "artifact removed");
    Ok(())
}
