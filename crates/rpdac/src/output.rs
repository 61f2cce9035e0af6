//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use rpdac_core::{ApplyReport, Outcome, error_chain};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

fn paint_status(status: &str, color: bool) -> String {
    if !color {
        return status.to_owned();
    }
    match status {
        "created" => status.green().to_string(),
        "updated" => status.yellow().to_string(),
        "failed" => status.red().bold().to_string(),
        _ => status.dimmed().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single item. Table output uses `detail_fn`, since a single
/// object has no row shape.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> Result<String, CliError>,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Apply report ─────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Error")]
    error: String,
}

/// One file of an [`ApplyReport`] in serializable form.
#[derive(Debug, Serialize)]
pub struct ReportEntry {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn report_entries(report: &ApplyReport) -> Vec<ReportEntry> {
    report
        .files
        .iter()
        .map(|f| {
            let file = f.path.display().to_string();
            match &f.result {
                Ok(applied) => ReportEntry {
                    file,
                    kind: Some(applied.kind.to_string()),
                    name: Some(applied.name.clone()),
                    status: applied.outcome.to_string(),
                    error: None,
                },
                Err(err) => ReportEntry {
                    file,
                    kind: None,
                    name: None,
                    status: "failed".into(),
                    error: Some(error_chain(err)),
                },
            }
        })
        .collect()
}

/// Per-file table (or structured list) followed, in table mode, by the
/// one-line totals.
pub fn render_report(
    format: OutputFormat,
    report: &ApplyReport,
    color: bool,
) -> Result<String, CliError> {
    let entries = report_entries(report);
    let body = render_list(
        format,
        &entries,
        |e| ReportRow {
            file: e.file.clone(),
            kind: e.kind.clone().unwrap_or_default(),
            name: e.name.clone().unwrap_or_default(),
            status: paint_status(&e.status, color),
            error: e.error.clone().unwrap_or_default(),
        },
        |e| format!("{}\t{}", e.status, e.file),
    )?;

    match format {
        OutputFormat::Table => Ok(format!("{body}\n{report}")),
        _ => Ok(body),
    }
}

/// Single-line outcome for one object.
pub fn outcome_line(kind: &str, name: &str, outcome: Outcome, color: bool) -> String {
    format!("{kind} \"{name}\" {}", paint_status(&outcome.to_string(), color))
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Render {
        format: "json",
        message: e.to_string(),
    })
}

pub(crate) fn render_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render {
        format: "yaml",
        message: e.to_string(),
    })
}
