//! # relay-adapters
//!
//! Per-tool output adapters: where an asset lands for a given consumer tool
//! and how its content is rewritten on the way.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use relay_adapters::{AdapterRegistry, AssetMetadata};
//! use relay_core::{TargetTool, TemplateFile};
//!
//! fn place(file: &TemplateFile) {
//!     if let Ok(registry) = AdapterRegistry::new() {
//!         let adapter = registry.get(TargetTool::Claude);
//!         let meta = AssetMetadata::for_template(file);
//!         let path = adapter.output_path(meta.category, &file.relative_path);
//!         if let Ok(content) = adapter.transform_content(&file.content, &meta) {
//!             println!("{path}: {} bytes", content.len());
//!         }
//!     }
//! }
//! ```

pub mod adapter;
pub mod error;
pub mod preamble;
pub mod registry;
pub mod sections;
pub mod tools;

pub use adapter::{AssetMetadata, OutputAdapter};
pub use error::AdapterError;
pub use preamble::Preambles;
pub use registry::AdapterRegistry;
pub use sections::strip_tool_sections;
