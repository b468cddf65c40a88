use std::path::PathBuf;
use std::sync::Arc;

use pressroom_core::settings::Settings;
use pressroom_export::PdfGenerator;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub generator: PdfGenerator,
}

impl AppState {
    pub fn new(settings: Settings, generator: PdfGenerator) -> Self {
        Self {
            settings: Arc::new(settings),
            generator,
        }
    }

    /// Directory holding generated documents.
    pub fn temp_dir(&self) -> PathBuf {
        self.generator.temp_dir()
    }
}
