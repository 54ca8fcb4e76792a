//! `relay verify`: checksum every tracked asset, optionally restoring drift.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use relay_core::TargetTool;
use relay_sync::{VerifyAssetResult, VerifyOptions, VerifyResult, VerifyStatus};

use super::{build_engine, load_config, project_root, FilterArgs, SourceArgs};
use crate::report::{self, OutputMode};

/// Arguments for `relay verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Project directory (defaults to the current directory).
    pub path: Option<PathBuf>,

    /// Rewrite modified and missing assets from their templates.
    #[arg(long)]
    pub restore: bool,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Layout to restore with; defaults to the targets recorded in the manifest.
    #[arg(long = "target", value_delimiter = ',', num_args = 1..)]
    pub targets: Vec<TargetTool>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct VerifyRow {
    #[tabled(rename = "asset")]
    asset: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "expected")]
    expected: String,
    #[tabled(rename = "actual")]
    actual: String,
}

impl VerifyArgs {
    pub fn run(self, mode: OutputMode) -> Result<i32> {
        let root = project_root(self.path.clone())?;
        let cfg = load_config(&root, &self.source, &[])?;
        let engine = build_engine(&cfg, &self.source)?;
        let options = VerifyOptions {
            restore: self.restore,
            filter: self.filter.to_filter()?,
            targets: self.targets.clone(),
        };

        let result = engine
            .verify(&root, &options)
            .with_context(|| format!("verify failed for {}", root.display()))?;
        match mode {
            OutputMode::Json => report::json(result.exit_code, &result)?,
            OutputMode::Human => print_table(&result),
        }
        Ok(result.exit_code)
    }
}

fn short(checksum: Option<&String>) -> String {
    checksum
        .map(|c| c.chars().take(12).collect())
        .unwrap_or_else(|| "-".to_string())
}

fn status_label(asset: &VerifyAssetResult) -> String {
    match asset.status {
        VerifyStatus::Valid => "valid".green().to_string(),
        VerifyStatus::Modified => "modified".yellow().to_string(),
        VerifyStatus::Missing => "missing".red().to_string(),
        VerifyStatus::Restored => "restored".cyan().to_string(),
    }
}

fn print_table(result: &VerifyResult) {
    if !result.assets.is_empty() {
        let rows: Vec<VerifyRow> = result
            .assets
            .iter()
            .map(|a| VerifyRow {
                asset: a.tracking_path.clone(),
                status: status_label(a),
                expected: short(a.expected_checksum.as_ref()),
                actual: short(a.actual_checksum.as_ref()),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    report::problems(&[], &result.errors);
    let summary = format!(
        "{} valid, {} modified, {} missing, {} restored",
        result.valid_count(),
        result.modified_count(),
        result.missing_count(),
        result.restored_count()
    );
    if result.exit_code == 0 {
        report::ok(&summary);
    } else {
        report::error(&summary);
    }
}
