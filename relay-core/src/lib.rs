//! Relay core library: domain types, tracking paths, manifest shape,
//! checksums, security validation, and project configuration.
//!
//! - [`types`]: template files, asset categories, filters, target tools
//! - [`tracking`]: manifest tracking-path syntax (`plain` or `tool:path`)
//! - [`manifest`]: the persisted install record
//! - [`checksum`]: SHA-256 helpers
//! - [`security`]: manifest and path validation
//! - [`config`]: `.relay.yaml` load / save
//! - [`error`]: [`CoreError`], [`SecurityViolation`]

pub mod checksum;
pub mod config;
pub mod error;
pub mod manifest;
pub mod security;
pub mod tracking;
pub mod types;

pub use error::{CoreError, SecurityViolation};
pub use manifest::{Manifest, SCHEMA_VERSION};
pub use tracking::TrackingPath;
pub use types::{
    AssetCategory, AssetTypeFilter, SourceDescriptor, SourceKind, TargetTool, TemplateFile,
};
