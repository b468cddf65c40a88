use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;

use pressroom_core::settings::{Environment, Settings};
use pressroom_export::error::ExportError;
use pressroom_export::options::{OptionValue, PageLayout, RendererOptions, keys};
use pressroom_export::renderer::PdfRenderer;
use pressroom_export::{DocumentRequest, PdfGenerator};
use tera::Context;

/// Stands in for wkhtmltopdf: writes a fake PDF and remembers the options.
#[derive(Default)]
struct RecordingRenderer {
    calls: Mutex<Vec<RendererOptions>>,
}

impl PdfRenderer for RecordingRenderer {
    fn render(
        &self,
        html: &str,
        options: &RendererOptions,
        output: &Path,
    ) -> Result<(), ExportError> {
        self.calls.lock().unwrap().push(options.clone());
        fs::write(output, format!("%PDF-1.4\n{html}")).unwrap();
        Ok(())
    }
}

struct FailingRenderer;

impl PdfRenderer for FailingRenderer {
    fn render(&self, _: &str, _: &RendererOptions, _: &Path) -> Result<(), ExportError> {
        Err(ExportError::Renderer {
            code: Some(1),
            stderr: "Exit with code 1 due to network error".to_string(),
        })
    }
}

struct Workspace {
    root: tempfile::TempDir,
    settings: Settings,
}

impl Workspace {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let assets = root.path().join("assets");
        fs::create_dir_all(&assets).unwrap();
        fs::create_dir_all(root.path().join("temp")).unwrap();
        fs::write(assets.join("doc.html"), "<p>{{ name }}</p>").unwrap();
        fs::write(assets.join("header.html"), "<div>head {{ name }}</div>").unwrap();
        fs::write(assets.join("footer.html"), "<div>foot {{ name }}</div>").unwrap();

        let settings = Settings {
            environment: Environment::Local,
            template_dir: assets,
            wkhtmltopdf_path: None,
        };
        Self { root, settings }
    }

    fn generator(&self, renderer: Arc<dyn PdfRenderer>) -> PdfGenerator {
        PdfGenerator::new(&self.settings, renderer)
            .with_temp_prefix(format!("{}/", self.root.path().display()))
    }

    fn temp(&self) -> PathBuf {
        self.root.path().join("temp")
    }
}

fn named(name: &str) -> Context {
    let mut context = Context::new();
    context.insert("name", name);
    context
}

#[test]
fn generates_html_and_pdf_in_temp_dir() {
    let ws = Workspace::new();
    let renderer = Arc::new(RecordingRenderer::default());
    let generator = ws.generator(renderer.clone());

    let request = DocumentRequest::new("doc.html", "doc1").context(named("Test"));
    let artifacts = generator.generate(&request).unwrap();

    assert_eq!(generator.temp_dir(), ws.temp());
    assert_eq!(artifacts.html, ws.temp().join("doc1.html"));
    assert_eq!(artifacts.pdf, ws.temp().join("doc1.pdf"));
    assert!(artifacts.header.is_none());
    assert!(artifacts.footer.is_none());
    assert_eq!(fs::read_to_string(&artifacts.html).unwrap(), "<p>Test</p>");
    assert!(fs::read(&artifacts.pdf).unwrap().starts_with(b"%PDF-"));
    assert_eq!(artifacts.file_names(), ["doc1.html", "doc1.pdf"]);

    let calls = renderer.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], RendererOptions::for_layout(&PageLayout::default()));
}

#[test]
fn header_and_footer_are_staged_and_passed_to_renderer() {
    let ws = Workspace::new();
    let renderer = Arc::new(RecordingRenderer::default());
    let generator = ws.generator(renderer.clone());

    let request = DocumentRequest::new("doc.html", "doc2")
        .header("header.html")
        .footer("footer.html")
        .context(named("Test"));
    let artifacts = generator.generate(&request).unwrap();

    let header = artifacts.header.clone().unwrap();
    let footer = artifacts.footer.clone().unwrap();
    assert_eq!(fs::read_to_string(&header).unwrap(), "<div>head Test</div>");
    assert_eq!(fs::read_to_string(&footer).unwrap(), "<div>foot Test</div>");
    assert_eq!(artifacts.paths().len(), 4);

    let calls = renderer.calls.lock().unwrap();
    assert_eq!(
        calls[0].get(keys::HEADER_HTML),
        Some(&OptionValue::from(header.as_path()))
    );
    assert_eq!(
        calls[0].get(keys::FOOTER_HTML),
        Some(&OptionValue::from(footer.as_path()))
    );
}

#[test]
fn layout_overrides_reach_the_renderer() {
    let ws = Workspace::new();
    let renderer = Arc::new(RecordingRenderer::default());
    let generator = ws.generator(renderer.clone());

    let layout = PageLayout {
        margin_top: "1in".to_string(),
        ..PageLayout::default()
    };
    let request = DocumentRequest::new("doc.html", "doc3")
        .layout(layout)
        .context(named("Test"));
    generator.generate(&request).unwrap();

    let calls = renderer.calls.lock().unwrap();
    assert_eq!(calls[0].get(keys::MARGIN_TOP), Some(&OptionValue::from("1in")));
}

#[test]
fn invalid_file_names_are_rejected_before_any_write() {
    let ws = Workspace::new();
    let generator = ws.generator(Arc::new(RecordingRenderer::default()));

    for name in ["", "..", "../escape", "a/b"] {
        let request = DocumentRequest::new("doc.html", name).context(named("Test"));
        let err = generator.generate(&request).unwrap_err();
        assert!(matches!(err, ExportError::InvalidFileName(_)), "name {name:?}");
    }
    assert_eq!(fs::read_dir(ws.temp()).unwrap().count(), 0);
}

#[test]
fn missing_main_template_writes_nothing() {
    let ws = Workspace::new();
    let generator = ws.generator(Arc::new(RecordingRenderer::default()));

    let err = generator
        .generate(&DocumentRequest::new("missing.html", "doc4"))
        .unwrap_err();

    assert!(matches!(err, ExportError::TemplateNotFound(_)));
    assert_eq!(fs::read_dir(ws.temp()).unwrap().count(), 0);
}

#[test]
fn renderer_failure_leaves_earlier_artifacts() {
    let ws = Workspace::new();
    let generator = ws.generator(Arc::new(FailingRenderer));

    let request = DocumentRequest::new("doc.html", "doc5")
        .header("header.html")
        .context(named("Test"));
    let err = generator.generate(&request).unwrap_err();

    assert!(matches!(err, ExportError::Renderer { code: Some(1), .. }));
    assert!(ws.temp().join("doc5.html").exists());
    assert!(!ws.temp().join("doc5.pdf").exists());
    // main html plus the staged header
    assert_eq!(fs::read_dir(ws.temp()).unwrap().count(), 2);
}

#[test]
fn concurrent_calls_with_one_name_keep_a_single_complete_artifact() {
    let ws = Workspace::new();
    let generator = ws.generator(Arc::new(RecordingRenderer::default()));

    thread::scope(|scope| {
        for name in ["First", "Second"] {
            let generator = &generator;
            scope.spawn(move || {
                let request = DocumentRequest::new("doc.html", "shared").context(named(name));
                generator.generate(&request).unwrap();
            });
        }
    });

    let html = fs::read_to_string(ws.temp().join("shared.html")).unwrap();
    assert!(html == "<p>First</p>" || html == "<p>Second</p>", "got {html:?}");
    assert!(ws.temp().join("shared.pdf").exists());
    assert_eq!(fs::read_dir(ws.temp()).unwrap().count(), 2);
}

#[test]
fn released_artifacts_are_gone() {
    let ws = Workspace::new();
    let generator = ws.generator(Arc::new(RecordingRenderer::default()));

    let request = DocumentRequest::new("doc.html", "doc6")
        .header("header.html")
        .footer("footer.html")
        .context(named("Test"));
    let artifacts = generator.generate(&request).unwrap();
    artifacts.release().unwrap();

    for path in artifacts.paths() {
        assert!(!path.exists(), "{} still exists", path.display());
    }
    assert!(matches!(artifacts.release(), Err(ExportError::Io { .. })));
}
