use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use pressroom_core::settings::Settings;

use crate::error::ExportError;
use crate::options::RendererOptions;

/// Binary looked up on `PATH` when no explicit path is configured.
pub const DEFAULT_BINARY: &str = "wkhtmltopdf";

/// Converts an HTML document into a PDF file at `output`.
pub trait PdfRenderer: Send + Sync {
    fn render(&self, html: &str, options: &RendererOptions, output: &Path)
    -> Result<(), ExportError>;
}

/// `wkhtmltopdf` invoked as a blocking subprocess.
///
/// The HTML is piped on stdin and the PDF written straight to `output`.
/// There is no timeout.
#[derive(Debug, Clone)]
pub struct Wkhtmltopdf {
    binary: PathBuf,
}

impl Wkhtmltopdf {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Rely on `PATH` to find the binary.
    pub fn discover() -> Self {
        Self::new(DEFAULT_BINARY)
    }

    /// Explicit binary from settings when configured, otherwise discovery.
    pub fn from_settings(settings: &Settings) -> Self {
        match &settings.wkhtmltopdf_path {
            Some(path) => Self::new(path),
            None => Self::discover(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Full argument list for one invocation, `-` standing for stdin.
    pub fn command_args(options: &RendererOptions, output: &Path) -> Vec<String> {
        let mut args = vec!["--quiet".to_string()];
        args.extend(options.to_args());
        args.push("-".to_string());
        args.push(output.display().to_string());
        args
    }
}

impl PdfRenderer for Wkhtmltopdf {
    fn render(
        &self,
        html: &str,
        options: &RendererOptions,
        output: &Path,
    ) -> Result<(), ExportError> {
        let args = Self::command_args(options, output);
        tracing::info!(
            binary = %self.binary.display(),
            output = %output.display(),
            "invoking PDF renderer"
        );

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ExportError::RendererNotFound {
                    binary: self.binary.clone(),
                },
                _ => ExportError::io(&self.binary, e),
            })?;

        // stdin is fed while stdout/stderr drain, or full pipes block both ends.
        let stdin = child.stdin.take();
        let (written, finished) = thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut pipe) => pipe.write_all(html.as_bytes()),
                None => Ok(()),
            });
            let finished = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, finished)
        });

        let outcome = finished.map_err(|e| ExportError::io(&self.binary, e))?;
        let stderr = String::from_utf8_lossy(&outcome.stderr).trim().to_string();

        if !outcome.status.success() {
            tracing::error!(
                code = ?outcome.status.code(),
                stderr = %stderr,
                "PDF renderer failed"
            );
            return Err(ExportError::Renderer {
                code: outcome.status.code(),
                stderr,
            });
        }

        // A clean exit status wins over a broken pipe.
        if let Err(e) = written
            && e.kind() != io::ErrorKind::BrokenPipe
        {
            return Err(ExportError::io(&self.binary, e));
        }

        let written_bytes = std::fs::metadata(output).map(|m| m.len()).unwrap_or(0);
        if written_bytes == 0 {
            return Err(ExportError::Renderer {
                code: outcome.status.code(),
                stderr: format!("no PDF written to {}", output.display()),
            });
        }

        Ok(())
    }
}
