//! Presentation boundary: every command hands its result to one of these
//! functions together with an explicit [`OutputMode`].

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a, T: Serialize> {
    ok: bool,
    exit_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Print `{ "ok", "exitCode", "result" }` on stdout.
pub fn json<T: Serialize>(exit_code: i32, result: &T) -> Result<()> {
    let envelope = Envelope {
        ok: exit_code == 0,
        exit_code,
        result: Some(result),
        error: None,
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

/// Report an error that stopped the command.
pub fn fatal(mode: OutputMode, err: &anyhow::Error) {
    match mode {
        OutputMode::Json => {
            let envelope: Envelope<'_, ()> = Envelope {
                ok: false,
                exit_code: 1,
                result: None,
                error: Some(format!("{err:#}")),
            };
            match serde_json::to_string_pretty(&envelope) {
                Ok(text) => println!("{text}"),
                Err(_) => eprintln!("{err:#}"),
            }
        }
        OutputMode::Human => eprintln!("{} {err:#}", "✗".red().bold()),
    }
}

pub fn ok(line: &str) {
    println!("{} {line}", "✓".green());
}

pub fn unchanged(line: &str) {
    println!("{} {}", "·".dimmed(), line.dimmed());
}

pub fn warning(line: &str) {
    println!("{} {line}", "!".yellow().bold());
}

pub fn error(line: &str) {
    println!("{} {line}", "✗".red().bold());
}

/// One marker line per warning and error.
pub fn problems(warnings: &[String], errors: &[String]) {
    for w in warnings {
        warning(w);
    }
    for e in errors {
        error(e);
    }
}
