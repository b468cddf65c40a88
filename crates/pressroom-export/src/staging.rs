//! Header/footer staging.
//!
//! `wkhtmltopdf` only accepts headers and footers as separate HTML files, so
//! those templates are rendered to their own file in the temp directory and
//! the file path is recorded in the renderer options.

use std::io::Write;
use std::path::{Path, PathBuf};

use tera::Context;

use crate::error::ExportError;
use crate::options::{RendererOptions, keys};
use crate::render::TemplateRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Header,
    Footer,
}

impl Slot {
    /// Renderer option that receives the staged file path.
    pub fn option_key(self) -> &'static str {
        match self {
            Slot::Header => keys::HEADER_HTML,
            Slot::Footer => keys::FOOTER_HTML,
        }
    }

    fn file_prefix(self) -> &'static str {
        match self {
            Slot::Header => "header-",
            Slot::Footer => "footer-",
        }
    }
}

/// Render `template` into a new uniquely named `.html` file under `dir`.
///
/// With no template the options come back untouched and nothing is written.
/// Otherwise the returned options carry the staged path under the slot's
/// key, and the path is returned too so the caller can release it later.
/// The file handle is closed before returning; the file itself is kept.
pub fn stage(
    renderer: &TemplateRenderer,
    slot: Slot,
    template: Option<&str>,
    options: RendererOptions,
    context: &Context,
    dir: &Path,
) -> Result<(RendererOptions, Option<PathBuf>), ExportError> {
    let Some(template) = template else {
        return Ok((options, None));
    };

    let html = renderer.render(template, context)?;

    let mut file = tempfile::Builder::new()
        .prefix(slot.file_prefix())
        .suffix(".html")
        .tempfile_in(dir)
        .map_err(|e| ExportError::io(dir, e))?;
    file.write_all(html.as_bytes())
        .map_err(|e| ExportError::io(file.path(), e))?;

    // An error above drops `file`, which removes the half-written file.
    let (_handle, path) = file
        .keep()
        .map_err(|e| ExportError::io(dir, e.error))?;

    tracing::debug!(?slot, template, path = %path.display(), "staged template");

    let options = options.with(slot.option_key(), path.as_path());
    Ok((options, Some(path)))
}
