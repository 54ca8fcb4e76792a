//! `relay validate`: compliance check; `--strict` / `--ci` turns drift into errors.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use relay_sync::{validate_compliance, ComplianceReport, ValidationMode};

use super::project_root;
use crate::report::{self, OutputMode};

/// Arguments for `relay validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Project directory (defaults to the current directory).
    pub path: Option<PathBuf>,

    /// Treat drift as an error.
    #[arg(long, alias = "ci")]
    pub strict: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ValidateArgs {
    pub fn run(self, mode: OutputMode) -> Result<i32> {
        let root = project_root(self.path.clone())?;
        let validation = if self.strict {
            ValidationMode::Strict
        } else {
            ValidationMode::Default
        };
        let compliance = validate_compliance(&root, validation)
            .with_context(|| format!("validation failed for {}", root.display()))?;
        match mode {
            OutputMode::Json => report::json(compliance.exit_code, &compliance)?,
            OutputMode::Human => print_report(&compliance),
        }
        Ok(compliance.exit_code)
    }
}

fn print_report(compliance: &ComplianceReport) {
    report::problems(&compliance.warnings, &compliance.errors);
    if compliance.compliant {
        report::ok("compliant");
    } else {
        report::error("not compliant");
    }
}
