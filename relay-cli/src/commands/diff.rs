//! `relay diff`: show unified diffs for what `sync --force` would write.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use relay_core::TargetTool;
use relay_sync::SyncOptions;

use super::{build_engine, load_config, project_root, SourceArgs};

/// Arguments for `relay diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Project directory (defaults to the current directory).
    pub path: Option<PathBuf>,

    /// Target tools (copilot, claude, cursor, windsurf, cline, aider).
    #[arg(long = "target", value_delimiter = ',', num_args = 1..)]
    pub targets: Vec<TargetTool>,

    #[command(flatten)]
    pub source: SourceArgs,
}

impl DiffArgs {
    pub fn run(self) -> Result<i32> {
        let root = project_root(self.path.clone())?;
        let cfg = load_config(&root, &self.source, &self.targets)?;
        let engine = build_engine(&cfg, &self.source)?;
        let options = SyncOptions {
            targets: cfg.targets.clone(),
            ..Default::default()
        };

        let diffs = engine
            .diff(&root, &options)
            .with_context(|| format!("diff failed for {}", root.display()))?;

        if diffs.is_empty() {
            println!("No differences for {}.", root.display());
            return Ok(0);
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }
        Ok(0)
    }
}
