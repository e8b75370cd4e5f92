//! Service layer for the markdown generator.
//!
//! - Markdown (document assembly and style post-processing)
//! - Generator (validation, rendering, artifact storage)

mod generator;
pub mod markdown;

pub use generator::GeneratorService;
pub use markdown::MarkdownRenderer;
