use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("template parse error: {0}")]
    TemplateParse(String),

    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF renderer not found at {}", binary.display())]
    RendererNotFound { binary: PathBuf },

    #[error("PDF renderer failed (exit code {code:?}): {stderr}")]
    Renderer { code: Option<i32>, stderr: String },
}

impl ExportError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl ExportError {
    /// Error raised while loading templates into the engine.
    pub(crate) fn from_parse(e: tera::Error) -> Self {
        match missing_template(&e) {
            Some(name) => ExportError::TemplateNotFound(name),
            None => ExportError::TemplateParse(error_chain(&e)),
        }
    }
}

impl From<tera::Error> for ExportError {
    fn from(e: tera::Error) -> Self {
        match missing_template(&e) {
            Some(name) => ExportError::TemplateNotFound(name),
            None => ExportError::TemplateRender(error_chain(&e)),
        }
    }
}

/// Name of the template Tera could not find, wherever it sits in the
/// error chain.
pub(crate) fn missing_template(e: &tera::Error) -> Option<String> {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(e);
    while let Some(error) = current {
        if let Some(tera_error) = error.downcast_ref::<tera::Error>() {
            match &tera_error.kind {
                // A failed `include` lists every candidate as `[a.html, b.html]`.
                tera::ErrorKind::TemplateNotFound(name) => {
                    let listed = name.strip_prefix('[').and_then(|n| n.strip_suffix(']'));
                    return Some(listed.unwrap_or(name).to_string());
                }
                tera::ErrorKind::MissingParent { parent, .. } => return Some(parent.clone()),
                _ => {}
            }
        }
        current = error.source();
    }
    None
}

/// Flatten an error and its sources into one line.
pub(crate) fn error_chain(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
