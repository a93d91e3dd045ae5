//! PageForge Core - Landing Page Composer
//!
//! # Ground Rules
//! 1. Catalogs Are Read-Only
//! 2. Bad Data Fails At Load, Not At Render
//! 3. Resolution Is Pure And Copies
//! 4. The Draft Owns Render Order
//! 5. Exports Degrade, They Do Not Vanish

pub mod builder;
pub mod catalog;
pub mod config;
pub mod export;
pub mod families;
pub mod frame;
pub mod hashing;
pub mod industries;
pub mod merge;
pub mod preview;
pub mod render;
pub mod resolver;
pub mod server;
pub mod theme;
pub mod validation;
pub mod variants;

#[cfg(test)]
mod test_support;

pub use builder::{BuilderState, Direction, SectionEntry, SectionUpdate};
pub use catalog::{Catalog, CatalogError};
pub use config::PipelineConfig;
pub use export::{ExportArtifact, ExportError, ExportPipeline, ExportSource};
pub use families::{SectionBlueprint, SectionComponent, TemplateFamily, DEFAULT_FAMILY};
pub use frame::{FrameDocument, FrameImage, HttpFetcher, PreviewFetcher, PreviewFrame, RenderedFrame};
pub use industries::IndustryProfile;
pub use merge::VariantSource;
pub use preview::{PreviewError, PreviewQuery};
pub use render::Renderer;
pub use resolver::{BlueprintResolver, ResolveError, ResolvedSection};
pub use validation::{CatalogValidator, ValidationResult};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MIN_ENGINE_VERSION: &str = "1.0.0";
