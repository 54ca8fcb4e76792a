//! # relay-sync
//!
//! Template sources, the sync engine, manifest persistence, and drift
//! detection.
//!
//! Build a [`SyncEngine`] around a [`TemplateProvider`] and call
//! [`SyncEngine::sync`] to install assets, [`SyncEngine::preview_sync`] for a
//! dry run, or [`SyncEngine::verify`] to classify drift. The read-only
//! [`compliance::validate_compliance`] needs no provider at all.

pub mod compliance;
pub mod diff;
pub mod engine;
pub mod error;
pub mod manifest_store;
mod plan;
pub mod source;
pub mod verify;
mod writer;

pub use compliance::{validate_compliance, ComplianceReport, ValidationMode};
pub use diff::FileDiff;
pub use engine::{
    CancelToken, OperationKind, PlannedOperation, SyncEngine, SyncOptions, SyncResult,
    SyncedAsset,
};
pub use error::SyncError;
pub use source::{provider_from_config, SourceError, TemplateProvider, TemplateResult};
pub use verify::{VerifyAssetResult, VerifyOptions, VerifyResult, VerifyStatus};
