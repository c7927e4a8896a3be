//! Identifier suggestions from natural-language phrases
//!
//! A phrase, usually Chinese, is sent to one or more online dictionaries.
//! Their English translations are filtered, case-converted and validated into
//! identifiers ready to replace the phrase in source code.

pub mod cache;
pub mod case_style;
pub mod engine;
pub mod mt;
pub mod normalizer;
pub mod settings;
pub mod status;

mod integration_tests;

pub use cache::ResultCache;
pub use case_style::CaseStyle;
pub use engine::Engine;
pub use normalizer::normalize;
pub use settings::{ConfigError, Settings};
pub use status::Status;
