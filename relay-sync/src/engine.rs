//! The sync engine.
//!
//! ## Decision per output
//!
//! 1. Category excluded by the filter → Skipped.
//! 2. Output path already produced earlier in this run → Skipped + warning.
//! 3. Target absent, or `force` → write; Synced (`wasUpdated` = existed).
//! 4. Target present, checksums equal → Unchanged, no write.
//! 5. Target present, checksums differ → Skipped + warning, no write.
//!
//! A fresh manifest of every Synced and Unchanged output is then saved,
//! replacing any earlier one. The manifest's own entry is appended to
//! `synced` after it is written and is not part of its own `checksums`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use relay_adapters::AdapterRegistry;
use relay_core::checksum::{file_checksum, sha256_hex};
use relay_core::{AssetTypeFilter, Manifest, SourceDescriptor, TargetTool, TemplateFile};

use crate::error::{io_err, SyncError};
use crate::manifest_store::{self, MANIFEST_TRACKING_PATH};
use crate::plan::{planned_outputs, PlannedOutput};
use crate::source::TemplateProvider;
use crate::writer::write_atomic;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Shared cancellation flag, checked between files.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Overwrite local files that differ from the template.
    pub force: bool,
    pub filter: Option<AssetTypeFilter>,
    /// Empty selects the default single-target layout under `.github`.
    pub targets: Vec<TargetTool>,
    pub cancel: Option<CancelToken>,
}

impl SyncOptions {
    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Target ids for the manifest. The identity layout records none, which
    /// is how restore tells it apart from an explicit `copilot` target.
    fn manifest_targets(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::with_capacity(self.targets.len());
        for tool in &self.targets {
            let id = tool.id().to_string();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncedAsset {
    /// Tracking path of the written file.
    pub relative_path: String,
    pub full_path: PathBuf,
    pub checksum: String,
    pub was_updated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub synced: Vec<SyncedAsset>,
    /// Tracking paths, as are `skipped`.
    pub unchanged: Vec<String>,
    /// Filtered, conflicting or duplicate outputs.
    pub skipped: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl SyncResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperationKind {
    Create,
    Update,
    /// Never planned: sync does not remove files.
    Delete,
    Skip,
    /// Local file differs and will be kept.
    Modify,
}

/// One step of a dry run. Never mutates storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedOperation {
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PlannedOperation {
    fn new(kind: OperationKind, path: impl Into<String>, reason: Option<&str>) -> Self {
        Self {
            kind,
            path: path.into(),
            reason: reason.map(str::to_string),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

enum Action {
    Filtered,
    Duplicate,
    Create,
    Overwrite { identical: bool },
    Unchanged { checksum: String },
    Conflict,
}

/// Tracks which output paths this run has already claimed.
#[derive(Default)]
struct RunState {
    claimed: HashSet<PathBuf>,
    /// Tracking keys already reported as filtered.
    filtered: HashSet<String>,
}

fn decide(
    output: &PlannedOutput,
    options: &SyncOptions,
    state: &mut RunState,
) -> Result<Action, SyncError> {
    if let Some(filter) = &options.filter {
        if !filter.includes(output.category) {
            return Ok(Action::Filtered);
        }
    }
    if !state.claimed.insert(output.full_path.clone()) {
        return Ok(Action::Duplicate);
    }
    if !output.full_path.exists() {
        return Ok(Action::Create);
    }
    let local = file_checksum(&output.full_path).map_err(|e| io_err(&output.full_path, e))?;
    let source = sha256_hex(output.content.as_bytes());
    Ok(match (options.force, local == source) {
        (true, identical) => Action::Overwrite { identical },
        (false, true) => Action::Unchanged { checksum: local },
        (false, false) => Action::Conflict,
    })
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct SyncEngine {
    provider: Box<dyn TemplateProvider>,
    registry: AdapterRegistry,
    tool_version: String,
}

impl SyncEngine {
    pub fn new(
        provider: Box<dyn TemplateProvider>,
        tool_version: impl Into<String>,
    ) -> Result<Self, SyncError> {
        Ok(Self {
            provider,
            registry: AdapterRegistry::new()?,
            tool_version: tool_version.into(),
        })
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    pub fn provider(&self) -> &dyn TemplateProvider {
        self.provider.as_ref()
    }

    pub(crate) fn load_templates(&self) -> Result<(Vec<TemplateFile>, SourceDescriptor), SyncError> {
        let fetched = self.provider.fetch();
        let (templates, source) = fetched.into_result()?;
        tracing::debug!("{} template(s) from {source}", templates.len());
        Ok((templates, source))
    }

    pub(crate) fn plan(
        &self,
        project_root: &Path,
        targets: &[TargetTool],
    ) -> Result<(Vec<PlannedOutput>, SourceDescriptor), SyncError> {
        let (templates, source) = self.load_templates()?;
        let outputs = planned_outputs(&templates, targets, &self.registry, project_root)?;
        Ok((outputs, source))
    }

    /// Install templates into `project_root` and replace its manifest.
    ///
    /// Source failures and security violations return `Err` before any file
    /// is written. Conflicts and per-file I/O failures are collected into the
    /// result instead.
    pub fn sync(&self, project_root: &Path, options: &SyncOptions) -> Result<SyncResult, SyncError> {
        let (outputs, source) = self.plan(project_root, &options.targets)?;
        self.apply(project_root, &outputs, source, options, |_| {})
    }

    /// Run the decision loop over planned outputs, calling `after_each` once
    /// every output has been handled.
    fn apply(
        &self,
        project_root: &Path,
        outputs: &[PlannedOutput],
        source: SourceDescriptor,
        options: &SyncOptions,
        mut after_each: impl FnMut(&PlannedOutput),
    ) -> Result<SyncResult, SyncError> {
        tracing::info!(
            "syncing {} output(s) from {source} into {}",
            outputs.len(),
            project_root.display()
        );

        let mut result = SyncResult::default();
        let mut manifest = Manifest::create(&self.tool_version, Some(source), Some(options.manifest_targets()));
        let mut state = RunState::default();

        for (index, output) in outputs.iter().enumerate() {
            if options.cancelled() {
                let remaining = outputs.len() - index;
                tracing::warn!("sync cancelled with {remaining} output(s) left");
                result.warnings.push(format!(
                    "sync cancelled: {remaining} file(s) not processed, manifest not written"
                ));
                return Ok(result);
            }

            let key = output.tracking_key();
            match decide(output, options, &mut state) {
                Err(err) => {
                    tracing::error!("{key}: {err}");
                    result.errors.push(format!("{key}: {err}"));
                }
                Ok(Action::Filtered) => {
                    if state.filtered.insert(key.clone()) {
                        tracing::debug!("filtered: {key}");
                        result.skipped.push(key);
                    }
                }
                Ok(Action::Duplicate) => {
                    tracing::warn!("duplicate output {key} from {}", output.template_path);
                    result.warnings.push(format!(
                        "{key}: already written from another template in this run, skipped {}",
                        output.template_path
                    ));
                    result.skipped.push(key);
                }
                Ok(Action::Unchanged { checksum }) => {
                    tracing::debug!("unchanged: {key}");
                    manifest.record(&key, checksum);
                    result.unchanged.push(key);
                }
                Ok(Action::Conflict) => {
                    tracing::warn!("local changes kept: {key}");
                    result.warnings.push(format!(
                        "{key}: local file differs from template, not overwritten (use --force to replace it)"
                    ));
                    result.skipped.push(key);
                }
                Ok(Action::Create) => record_write(output, key, false, &mut manifest, &mut result),
                Ok(Action::Overwrite { .. }) => {
                    record_write(output, key, true, &mut manifest, &mut result)
                }
            }
            after_each(output);
        }

        let manifest_path = manifest_store::manifest_path_at(project_root);
        let manifest_existed = manifest_path.exists();
        let manifest_path = manifest_store::save_at(project_root, &manifest)?;
        let checksum = file_checksum(&manifest_path).map_err(|e| io_err(&manifest_path, e))?;
        result.synced.push(SyncedAsset {
            relative_path: MANIFEST_TRACKING_PATH.to_string(),
            full_path: manifest_path,
            checksum,
            was_updated: manifest_existed,
        });

        tracing::info!(
            "sync done: {} synced, {} unchanged, {} skipped, {} error(s)",
            result.synced.len(),
            result.unchanged.len(),
            result.skipped.len(),
            result.errors.len()
        );
        Ok(result)
    }

    /// Dry run of [`SyncEngine::sync`]. Writes nothing, manifest included.
    pub fn preview_sync(
        &self,
        project_root: &Path,
        options: &SyncOptions,
    ) -> Result<Vec<PlannedOperation>, SyncError> {
        let (outputs, _) = self.plan(project_root, &options.targets)?;
        let mut state = RunState::default();
        let mut ops = Vec::with_capacity(outputs.len());

        for output in &outputs {
            if options.cancelled() {
                break;
            }
            let key = output.tracking_key();
            let action = match decide(output, options, &mut state) {
                Ok(action) => action,
                Err(err) => {
                    ops.push(PlannedOperation::new(
                        OperationKind::Skip,
                        key,
                        Some(err.to_string().as_str()),
                    ));
                    continue;
                }
            };
            let op = match action {
                Action::Filtered => {
                    if !state.filtered.insert(key.clone()) {
                        continue;
                    }
                    PlannedOperation::new(
                        OperationKind::Skip,
                        key,
                        Some("excluded by asset type filter"),
                    )
                }
                Action::Duplicate => PlannedOperation::new(
                    OperationKind::Skip,
                    key,
                    Some("already written from another template in this run"),
                ),
                Action::Create => PlannedOperation::new(OperationKind::Create, key, None),
                Action::Overwrite { identical: false } => {
                    PlannedOperation::new(OperationKind::Update, key, Some("content differs"))
                }
                Action::Overwrite { identical: true } => {
                    PlannedOperation::new(OperationKind::Update, key, Some("content identical"))
                }
                Action::Unchanged { .. } => {
                    PlannedOperation::new(OperationKind::Skip, key, Some("unchanged"))
                }
                Action::Conflict => PlannedOperation::new(
                    OperationKind::Modify,
                    key,
                    Some("local file differs; kept without --force"),
                ),
            };
            ops.push(op);
        }
        Ok(ops)
    }
}

fn write_and_checksum(output: &PlannedOutput) -> Result<String, SyncError> {
    write_atomic(&output.full_path, &output.content)?;
    file_checksum(&output.full_path).map_err(|e| io_err(&output.full_path, e))
}

fn record_write(
    output: &PlannedOutput,
    key: String,
    existed: bool,
    manifest: &mut Manifest,
    result: &mut SyncResult,
) {
    match write_and_checksum(output) {
        Ok(checksum) => {
            manifest.record(&key, &checksum);
            result.synced.push(SyncedAsset {
                relative_path: key,
                full_path: output.full_path.clone(),
                checksum,
                was_updated: existed,
            });
        }
        Err(err) => {
            tracing::error!("{key}: {err}");
            result.errors.push(format!("{key}: {err}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SourceError, TemplateResult};
    use std::fs;
    use tempfile::TempDir;

    struct Fixed(Vec<TemplateFile>);

    impl TemplateProvider for Fixed {
        fn fetch(&self) -> TemplateResult {
            TemplateResult::ok(self.0.clone(), self.describe())
        }

        fn describe(&self) -> SourceDescriptor {
            SourceDescriptor::bundled()
        }
    }

    struct Broken;

    impl TemplateProvider for Broken {
        fn fetch(&self) -> TemplateResult {
            TemplateResult::failed(
                SourceError::Unavailable {
                    path: PathBuf::from("/missing"),
                },
                self.describe(),
            )
        }

        fn describe(&self) -> SourceDescriptor {
            SourceDescriptor::bundled()
        }
    }

    fn engine(files: &[(&str, &str)]) -> SyncEngine {
        let templates = files.iter().map(|(p, c)| TemplateFile::new(*p, *c)).collect();
        SyncEngine::new(Box::new(Fixed(templates)), "0.1.0").unwrap()
    }

    #[test]
    fn first_sync_creates_files_and_manifest() {
        let tmp = TempDir::new().unwrap();
        let result = engine(&[("prompts/x.md", "B")])
            .sync(tmp.path(), &SyncOptions::default())
            .unwrap();
        assert_eq!(result.synced.len(), 2);
        assert_eq!(result.synced[0].relative_path, "prompts/x.md");
        assert!(!result.synced[0].was_updated);
        assert_eq!(result.synced[1].relative_path, MANIFEST_TRACKING_PATH);

        let manifest = manifest_store::load_at(tmp.path()).unwrap().unwrap();
        assert_eq!(manifest.assets, vec!["prompts/x.md".to_string()]);
        assert!(!manifest.checksums.contains_key(MANIFEST_TRACKING_PATH));
        assert!(manifest.targets.is_empty());
    }

    #[test]
    fn source_error_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let engine = SyncEngine::new(Box::new(Broken), "0.1.0").unwrap();
        let err = engine.sync(tmp.path(), &SyncOptions::default()).unwrap_err();
        assert!(matches!(err, SyncError::Source(SourceError::Unavailable { .. })));
        assert!(fs::read_dir(tmp.path()).unwrap().next().is_none());
    }

    #[test]
    fn collapsed_instructions_first_wins() {
        let tmp = TempDir::new().unwrap();
        let options = SyncOptions {
            targets: vec![TargetTool::Claude],
            ..Default::default()
        };
        let result = engine(&[
            ("copilot-instructions.md", "# One\n"),
            ("instructions/two.md", "# Two\n"),
        ])
        .sync(tmp.path(), &options)
        .unwrap();
        assert_eq!(result.skipped, vec!["claude:CLAUDE.md".to_string()]);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(fs::read_to_string(tmp.path().join("CLAUDE.md")).unwrap(), "# One\n");
    }

    #[test]
    fn cancelled_run_leaves_no_manifest() {
        let tmp = TempDir::new().unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let options = SyncOptions {
            cancel: Some(cancel),
            ..Default::default()
        };
        let result = engine(&[("prompts/x.md", "B")]).sync(tmp.path(), &options).unwrap();
        assert!(result.synced.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert!(!manifest_store::manifest_path_at(tmp.path()).exists());
    }

    #[test]
    fn cancel_between_files_keeps_written_ones() {
        let tmp = TempDir::new().unwrap();
        let engine = engine(&[("prompts/a.md", "A"), ("prompts/b.md", "B")]);
        let cancel = CancelToken::new();
        let options = SyncOptions {
            cancel: Some(cancel.clone()),
            ..Default::default()
        };
        let (outputs, source) = engine.plan(tmp.path(), &options.targets).unwrap();
        let result = engine
            .apply(tmp.path(), &outputs, source, &options, |_| cancel.cancel())
            .unwrap();

        assert_eq!(result.synced.len(), 1);
        assert_eq!(result.synced[0].relative_path, "prompts/a.md");
        assert_eq!(result.warnings.len(), 1);
        assert!(tmp.path().join(".github/prompts/a.md").exists());
        assert!(!tmp.path().join(".github/prompts/b.md").exists());
        assert!(!manifest_store::manifest_path_at(tmp.path()).exists());
    }

    #[test]
    fn preview_reports_unreadable_target_as_skip() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".github/prompts/x.md")).unwrap();
        let engine = engine(&[("prompts/x.md", "B"), ("prompts/y.md", "C")]);

        let ops = engine.preview_sync(tmp.path(), &SyncOptions::default()).unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].kind, OperationKind::Skip);
        assert_eq!(ops[0].path, "prompts/x.md");
        assert!(ops[0].reason.is_some());
        assert_eq!(ops[1].kind, OperationKind::Create);

        let result = engine.sync(tmp.path(), &SyncOptions::default()).unwrap();
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn filtered_outputs_are_reported_by_tracking_path() {
        let tmp = TempDir::new().unwrap();
        let options = SyncOptions {
            targets: vec![TargetTool::Claude],
            filter: Some(AssetTypeFilter::only(&["prompts"]).unwrap()),
            ..Default::default()
        };
        let result = engine(&[("agents/b.md", "# B\nbody\n"), ("prompts/a.md", "A")])
            .sync(tmp.path(), &options)
            .unwrap();
        assert_eq!(result.skipped.len(), 1);
        assert!(result.skipped[0].starts_with("claude:"), "{:?}", result.skipped);
    }

    #[test]
    fn manifest_targets_are_deduplicated_ids() {
        let options = SyncOptions {
            targets: vec![TargetTool::Cursor, TargetTool::Claude, TargetTool::Cursor],
            ..Default::default()
        };
        assert_eq!(
            options.manifest_targets(),
            vec!["cursor".to_string(), "claude".to_string()]
        );
        assert!(SyncOptions::default().manifest_targets().is_empty());
    }

    #[test]
    fn preview_reports_modify_for_local_edits() {
        let tmp = TempDir::new().unwrap();
        let engine = engine(&[("prompts/x.md", "B"), ("prompts/y.md", "C")]);
        engine.sync(tmp.path(), &SyncOptions::default()).unwrap();
        fs::write(tmp.path().join(".github/prompts/x.md"), "B edited").unwrap();
        fs::remove_file(tmp.path().join(".github/prompts/y.md")).unwrap();

        let ops = engine.preview_sync(tmp.path(), &SyncOptions::default()).unwrap();
        assert_eq!(ops[0].kind, OperationKind::Modify);
        assert_eq!(ops[1].kind, OperationKind::Create);

        let forced = SyncOptions {
            force: true,
            ..Default::default()
        };
        let ops = engine.preview_sync(tmp.path(), &forced).unwrap();
        assert_eq!(ops[0].kind, OperationKind::Update);
        assert_eq!(ops[0].reason.as_deref(), Some("content differs"));
    }
}
