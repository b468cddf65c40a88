use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tera::Context;

use pressroom_core::paths::{
    WORKING_PREFIX, artifact_base, html_artifact, is_plain_file_name, pdf_artifact, temp_path,
};
use pressroom_core::settings::{Environment, Settings};

use crate::error::ExportError;
use crate::options::{PageLayout, RendererOptions};
use crate::render::TemplateRenderer;
use crate::renderer::{PdfRenderer, Wkhtmltopdf};
use crate::staging::{Slot, stage};

const PARTIAL_PREFIX: &str = ".pressroom-";

/// One document to produce.
#[derive(Debug, Clone)]
pub struct DocumentRequest {
    /// Main template name, relative to the template directory.
    pub template: String,
    /// Base name of the output files; `.html` and `.pdf` are appended.
    pub file_name: String,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub layout: PageLayout,
    /// Values bound into the main, header and footer templates alike.
    pub context: Context,
}

impl DocumentRequest {
    pub fn new(template: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            file_name: file_name.into(),
            header: None,
            footer: None,
            layout: PageLayout::default(),
            context: Context::new(),
        }
    }

    pub fn header(mut self, template: impl Into<String>) -> Self {
        self.header = Some(template.into());
        self
    }

    pub fn footer(mut self, template: impl Into<String>) -> Self {
        self.footer = Some(template.into());
        self
    }

    pub fn layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }
}

/// Files produced by one [`PdfGenerator::generate`] call.
///
/// Nothing here is deleted automatically; the caller owns these files and
/// releases them with [`Artifacts::release`] or by name through
/// [`crate::cleanup::remove_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub html: PathBuf,
    pub pdf: PathBuf,
    pub header: Option<PathBuf>,
    pub footer: Option<PathBuf>,
}

impl Artifacts {
    /// Every path, staged header/footer first, then HTML, then PDF.
    pub fn paths(&self) -> Vec<&Path> {
        self.header
            .iter()
            .chain(self.footer.iter())
            .chain([&self.html, &self.pdf])
            .map(PathBuf::as_path)
            .collect()
    }

    /// File names relative to the temp directory, in [`Artifacts::paths`] order.
    pub fn file_names(&self) -> Vec<String> {
        self.paths()
            .into_iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect()
    }
}

/// Renders templates and drives the external renderer.
#[derive(Clone)]
pub struct PdfGenerator {
    templates: TemplateRenderer,
    renderer: Arc<dyn PdfRenderer>,
    environment: Environment,
    temp_prefix: String,
}

impl std::fmt::Debug for PdfGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfGenerator")
            .field("templates", &self.templates)
            .field("environment", &self.environment)
            .field("temp_prefix", &self.temp_prefix)
            .finish_non_exhaustive()
    }
}

impl PdfGenerator {
    pub fn new(settings: &Settings, renderer: Arc<dyn PdfRenderer>) -> Self {
        Self {
            templates: TemplateRenderer::new(&settings.template_dir),
            renderer,
            environment: settings.environment,
            temp_prefix: WORKING_PREFIX.to_string(),
        }
    }

    /// Generator backed by `wkhtmltopdf`, explicit path or `PATH` lookup.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings, Arc::new(Wkhtmltopdf::from_settings(settings)))
    }

    /// Prefix for the local temp directory (`./` by default, giving `./temp`).
    pub fn with_temp_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temp_prefix = prefix.into();
        self
    }

    /// Directory the artifacts are written to.
    pub fn temp_dir(&self) -> PathBuf {
        temp_path(self.environment, &self.temp_prefix)
    }

    /// Produce `<temp>/<file_name>.html` and `<temp>/<file_name>.pdf`.
    ///
    /// Steps run in order and stop at the first error. Files written before
    /// a failure stay on disk, so a renderer failure leaves the HTML and any
    /// staged header/footer behind. Calls sharing a file name overwrite each
    /// other's files.
    pub fn generate(&self, request: &DocumentRequest) -> Result<Artifacts, ExportError> {
        if !is_plain_file_name(&request.file_name) {
            return Err(ExportError::InvalidFileName(request.file_name.clone()));
        }

        tracing::info!(
            template = %request.template,
            file_name = %request.file_name,
            "generating PDF"
        );

        let content = self.templates.render(&request.template, &request.context)?;

        let dir = self.temp_dir();
        let base = artifact_base(&dir, &request.file_name);
        let html = html_artifact(&base);
        let pdf = pdf_artifact(&base);

        write_replacing(&dir, &html, content.as_bytes())?;

        let options = RendererOptions::for_layout(&request.layout);
        let (options, header) = stage(
            &self.templates,
            Slot::Header,
            request.header.as_deref(),
            options,
            &request.context,
            &dir,
        )?;
        let (options, footer) = stage(
            &self.templates,
            Slot::Footer,
            request.footer.as_deref(),
            options,
            &request.context,
            &dir,
        )?;

        // Render next to the target and rename, so a concurrent call with
        // the same name never observes a half-written PDF.
        let rendering = tempfile::Builder::new()
            .prefix(PARTIAL_PREFIX)
            .suffix(".pdf")
            .tempfile_in(&dir)
            .map_err(|e| ExportError::io(&dir, e))?
            .into_temp_path();
        self.renderer.render(&content, &options, &rendering)?;
        rendering
            .persist(&pdf)
            .map_err(|e| ExportError::io(&pdf, e.error))?;

        tracing::info!(pdf = %pdf.display(), "PDF generated");
        Ok(Artifacts {
            html,
            pdf,
            header,
            footer,
        })
    }
}

/// Write `bytes` to `target` through a temp file in `dir` and a rename.
fn write_replacing(dir: &Path, target: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let mut file = tempfile::Builder::new()
        .prefix(PARTIAL_PREFIX)
        .tempfile_in(dir)
        .map_err(|e| ExportError::io(dir, e))?;
    file.write_all(bytes)
        .map_err(|e| ExportError::io(file.path(), e))?;
    file.persist(target)
        .map_err(|e| ExportError::io(target, e.error))?;
    Ok(())
}
