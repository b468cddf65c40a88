//! pressroom-export
//!
//! PDF generation from HTML templates. Templates are rendered with Tera,
//! staged as HTML files in the temp directory and handed to an external
//! HTML-to-PDF renderer (`wkhtmltopdf`). The produced files stay on disk
//! until the caller releases them through [`cleanup`].

pub mod cleanup;
pub mod error;
pub mod options;
pub mod pdf;
pub mod render;
pub mod renderer;
pub mod staging;

pub use pdf::{Artifacts, DocumentRequest, PdfGenerator};
