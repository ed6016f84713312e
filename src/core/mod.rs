//! Core types and traits for evolution analysis.

mod analyzer;
mod error;
#[cfg(feature = "complexity")]
mod language;

pub use analyzer::{AnalysisContext, Analyzer};
pub use error::{Error, Result};
#[cfg(feature = "complexity")]
pub use language::Language;
