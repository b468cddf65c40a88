//! Temp directory and artifact path conventions.
//!
//! Pure path functions, no filesystem access. These define where the PDF
//! pipeline stages its intermediate and output files.

use std::path::{Path, PathBuf};

use crate::settings::Environment;

/// Fixed system temp directory used outside local development.
pub const SYSTEM_TEMP_DIR: &str = "/tmp";

/// Directory name appended to the caller prefix in local development.
pub const LOCAL_TEMP_DIR: &str = "temp";

/// Prefix used when the pipeline writes its artifacts.
pub const WORKING_PREFIX: &str = "./";

pub const HTML_EXTENSION: &str = "html";
pub const PDF_EXTENSION: &str = "pdf";

/// Resolve the temp directory: `<prefix>temp` when local, `/tmp` otherwise.
///
/// The prefix is concatenated as a string, so `"./"` yields `./temp` and
/// `""` yields `temp`.
pub fn temp_path(environment: Environment, prefix: &str) -> PathBuf {
    if environment.is_local() {
        PathBuf::from(format!("{prefix}{LOCAL_TEMP_DIR}"))
    } else {
        PathBuf::from(SYSTEM_TEMP_DIR)
    }
}

/// Temp directory as seen from an absolute working directory.
pub fn absolute_temp_path(environment: Environment, cwd: &Path) -> PathBuf {
    temp_path(environment, &format!("{}/", cwd.display()))
}

/// `<dir>/<file_name>`, the base that `.html` and `.pdf` are appended to.
pub fn artifact_base(dir: &Path, file_name: &str) -> PathBuf {
    dir.join(file_name)
}

pub fn html_artifact(base: &Path) -> PathBuf {
    with_suffix(base, HTML_EXTENSION)
}

pub fn pdf_artifact(base: &Path) -> PathBuf {
    with_suffix(base, PDF_EXTENSION)
}

// Appends rather than replaces: `report.v2` becomes `report.v2.pdf`.
fn with_suffix(base: &Path, extension: &str) -> PathBuf {
    let mut raw = base.as_os_str().to_owned();
    raw.push(".");
    raw.push(extension);
    PathBuf::from(raw)
}

/// True when `name` is a single, ordinary path component: non-empty, no
/// separators, not `.` or `..`, no NUL byte.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
