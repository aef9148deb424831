//! Report renderers for the enriched repository list.
//!
//! - [`table`]: comfy-table output with colored URL and license columns.
//! - [`csv`]: `Dependency,RepoURL,License,Version` rows.
//! - JSON is a pretty-printed array of [`Repository`] records.
//! - [`licenses`]: writes captured license texts next to the project.
//!
//! Rows always follow the order the repositories were resolved in.

pub mod csv;
pub mod licenses;
pub mod table;

use std::io::Write;

use anyhow::Result;

use crate::cli::ReportFormat;
use crate::models::Repository;

pub const HEADER_ROW: [&str; 4] = ["Dependency", "RepoURL", "License", "Version"];

/// Render `repos` in `format`. An empty list renders nothing.
pub fn render(
    repos: &[Repository],
    format: ReportFormat,
    styled: bool,
    out: &mut dyn Write,
) -> Result<()> {
    if repos.is_empty() {
        return Ok(());
    }

    match format {
        ReportFormat::Table => table::render(repos, styled, out),
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, repos)?;
            writeln!(out)?;
            Ok(())
        }
        ReportFormat::Csv => csv::render(repos, out),
    }
}
