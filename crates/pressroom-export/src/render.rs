use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tera::{Context, Template, Tera, Value};

use pressroom_core::price::format_price_value;

use crate::error::{ExportError, error_chain, missing_template};

/// Name under which the price formatter is available inside templates.
pub const PRICE_FILTER: &str = "price";

/// Renders named templates from a fixed template directory.
///
/// Templates are read from disk on every call, together with whatever they
/// `extends`, `include` or `import`, so edits to the directory show up
/// without a restart. Values are inserted verbatim (no autoescaping).
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    dir: PathBuf,
}

impl TemplateRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Render the template `name` (relative to the template directory).
    pub fn render(&self, name: &str, context: &Context) -> Result<String, ExportError> {
        let mut sources = Vec::new();
        self.collect(name, &mut sources)?;

        // Included templates are only known once rendering reaches them:
        // load each one Tera reports missing and render again.
        loop {
            let mut tera = engine();
            tera.add_raw_templates(sources.iter().map(|(n, s)| (n.as_str(), s.as_str())))
                .map_err(ExportError::from_parse)?;

            let error = match tera.render(name, context) {
                Ok(rendered) => {
                    tracing::debug!(template = name, bytes = rendered.len(), "template rendered");
                    return Ok(rendered);
                }
                Err(e) => e,
            };

            let loaded = sources.len();
            if let Some(missing) = missing_template(&error) {
                for candidate in include_candidates(&missing) {
                    if self.resolve(candidate).is_ok() {
                        self.collect(candidate, &mut sources)?;
                    }
                }
            }
            if sources.len() == loaded {
                return Err(error.into());
            }
        }
    }

    /// Render a template given as a string rather than a file name.
    pub fn render_str(
        &self,
        name: &str,
        content: &str,
        context: &Context,
    ) -> Result<String, ExportError> {
        let mut tera = engine();
        tera.add_raw_template(name, content)
            .map_err(ExportError::from_parse)?;

        Ok(tera.render(name, context)?)
    }

    /// Map a template name to its file. Names that would leave the template
    /// directory never resolve.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, ExportError> {
        let relative = Path::new(name);
        let contained = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        let path = self.dir.join(relative);
        if contained && path.is_file() {
            Ok(path)
        } else {
            Err(ExportError::TemplateNotFound(name.to_string()))
        }
    }

    /// Load `name` plus the templates it extends or imports macros from,
    /// as found by Tera's own parser.
    fn collect(&self, name: &str, sources: &mut Vec<(String, String)>) -> Result<(), ExportError> {
        if sources.iter().any(|(loaded, _)| loaded == name) {
            return Ok(());
        }

        let path = self.resolve(name)?;
        let source = fs::read_to_string(&path).map_err(|e| ExportError::io(&path, e))?;
        let parsed = Template::new(name, None, &source).map_err(ExportError::from_parse)?;
        sources.push((name.to_string(), source));

        let imports = parsed.imported_macro_files.into_iter().map(|(file, _)| file);
        for dependency in parsed.parent.into_iter().chain(imports) {
            self.collect(&dependency, sources)?;
        }
        Ok(())
    }
}

/// Build a Tera context from a JSON object.
pub fn context_from_value(value: Value) -> Result<Context, ExportError> {
    Context::from_value(value).map_err(|e| ExportError::TemplateRender(error_chain(&e)))
}

fn engine() -> Tera {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.register_filter(PRICE_FILTER, price_filter);
    tera
}

fn price_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    format_price_value(value)
        .map(Value::String)
        .map_err(|e| tera::Error::msg(format!("{PRICE_FILTER} filter: {e}")))
}

/// Names listed by a failed `include`, comma separated.
fn include_candidates(missing: &str) -> Vec<&str> {
    missing.split(", ").filter(|name| !name.is_empty()).collect()
}
