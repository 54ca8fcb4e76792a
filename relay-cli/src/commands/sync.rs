//! `relay sync`: install templates and rewrite the manifest.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use relay_core::TargetTool;
use relay_sync::{OperationKind, PlannedOperation, SyncOptions, SyncResult};

use super::{build_engine, load_config, project_root, FilterArgs, SourceArgs};
use crate::report::{self, OutputMode};

/// Arguments for `relay sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Project directory (defaults to the current directory).
    pub path: Option<PathBuf>,

    /// Overwrite local files that differ from the templates.
    #[arg(long)]
    pub force: bool,

    /// Show what would be written without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Target tools (copilot, claude, cursor, windsurf, cline, aider).
    #[arg(long = "target", value_delimiter = ',', num_args = 1..)]
    pub targets: Vec<TargetTool>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct DryRunJson<'a> {
    operations: &'a [PlannedOperation],
}

impl SyncArgs {
    pub fn run(self, mode: OutputMode) -> Result<i32> {
        let root = project_root(self.path.clone())?;
        let cfg = load_config(&root, &self.source, &self.targets)?;
        let engine = build_engine(&cfg, &self.source)?;
        let options = SyncOptions {
            force: self.force,
            filter: self.filter.to_filter()?,
            targets: cfg.targets.clone(),
            cancel: None,
        };

        if self.dry_run {
            let ops = engine
                .preview_sync(&root, &options)
                .with_context(|| format!("dry run failed for {}", root.display()))?;
            match mode {
                OutputMode::Json => report::json(0, &DryRunJson { operations: &ops })?,
                OutputMode::Human => print_plan(&ops),
            }
            return Ok(0);
        }

        let result = engine
            .sync(&root, &options)
            .with_context(|| format!("sync failed for {}", root.display()))?;
        let code = i32::from(!result.is_success());
        match mode {
            OutputMode::Json => report::json(code, &result)?,
            OutputMode::Human => print_result(&result),
        }
        Ok(code)
    }
}

fn print_plan(ops: &[PlannedOperation]) {
    for op in ops {
        let reason = op
            .reason
            .as_deref()
            .map(|r| format!(" ({r})"))
            .unwrap_or_default();
        let line = format!("{}{reason}", op.path);
        match op.kind {
            OperationKind::Create => report::ok(&format!("[dry-run] create {line}")),
            OperationKind::Update => report::ok(&format!("[dry-run] update {line}")),
            OperationKind::Modify => report::warning(&format!("[dry-run] keep {line}")),
            OperationKind::Delete => report::error(&format!("[dry-run] delete {line}")),
            OperationKind::Skip => report::unchanged(&format!("[dry-run] skip {line}")),
        }
    }
    if ops.is_empty() {
        println!("[dry-run] nothing to do");
    }
}

fn print_result(result: &SyncResult) {
    for asset in &result.synced {
        let verb = if asset.was_updated { "updated" } else { "created" };
        report::ok(&format!("{verb} {}", asset.relative_path));
    }
    for path in &result.unchanged {
        report::unchanged(&format!("unchanged {path}"));
    }
    report::problems(&result.warnings, &result.errors);
    println!(
        "{} synced, {} unchanged, {} skipped",
        result.synced.len(),
        result.unchanged.len(),
        result.skipped.len()
    );
}
