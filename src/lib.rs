//! hh-level library crate.
//!
//! Exposes the feature pipeline and training stages as a public API so that
//! integration tests in tests/ can import them via `hh_level::`.
//!
//! The binary entry point (src/main.rs) uses these same modules.
pub mod artifacts;
pub mod columns;
pub mod config;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod level;
pub mod loader;
pub mod output;
pub mod parsers;
pub mod pipeline;
pub mod predict;
pub mod trainer;
pub mod transform;
pub mod utils;
