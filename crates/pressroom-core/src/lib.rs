//! pressroom-core
//!
//! Shared vocabulary of the pressroom system: runtime settings, temp
//! directory conventions and the price formatter used by templates.
//! No templating or HTTP dependency.

pub mod error;
pub mod paths;
pub mod price;
pub mod settings;
