// src/export/mod.rs
//
// Result export: the records on screen → CSV, XLSX or PDF.
//
// Every format reads records through `LeadRecord::cells()`, so the file
// always carries the same five columns, in the same order, as the table.
// Nothing to export means nothing written: `render` and `export_records`
// return `Ok(None)` for an empty slice.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::{Local, NaiveDate};

use crate::config::{consts::EXPORT_STEM, options::ExportOptions};
use crate::error::ExportError;
use crate::lead::LeadRecord;

pub mod delimited;
pub mod document;
pub mod workbook;

use document::FontSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Pdf];

    pub fn ext(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Xlsx => "Excel",
            ExportFormat::Pdf => "PDF",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unknown export format '{}' (csv, xlsx, pdf)", other)),
        }
    }
}

/// Serialize in memory. `None` for an empty slice.
pub fn render(format: ExportFormat, records: &[LeadRecord]) -> Result<Option<Vec<u8>>, ExportError> {
    render_with(format, records, None)
}

/// `render`, with an extra font for PDF text the bundled faces can't set.
pub fn render_with(
    format: ExportFormat,
    records: &[LeadRecord],
    pdf_font: Option<&Path>,
) -> Result<Option<Vec<u8>>, ExportError> {
    if records.is_empty() {
        return Ok(None);
    }
    let bytes = match format {
        ExportFormat::Csv => delimited::to_bytes(records)?,
        ExportFormat::Xlsx => workbook::to_bytes(records)?,
        ExportFormat::Pdf => document::to_bytes_with(records, &FontSet::with_extra(pdf_font)?)?,
    };
    Ok(Some(bytes))
}

/// `leads_<YYYY-MM-DD>.<ext>`
pub fn export_filename(format: ExportFormat, date: NaiveDate) -> String {
    format!("{}_{}.{}", EXPORT_STEM, date.format("%Y-%m-%d"), format.ext())
}

/// Write `records` into `opts.dir`, dated today. Returns the path written, if any.
pub fn export_records(
    format: ExportFormat,
    records: &[LeadRecord],
    opts: &ExportOptions,
) -> Result<Option<PathBuf>, ExportError> {
    export_records_on(format, records, opts, Local::now().date_naive())
}

pub fn export_records_on(
    format: ExportFormat,
    records: &[LeadRecord],
    opts: &ExportOptions,
    date: NaiveDate,
) -> Result<Option<PathBuf>, ExportError> {
    let dir = opts.dir.as_path();
    let Some(bytes) = render_with(format, records, opts.pdf_font.as_deref())? else {
        logd!("Export: {} skipped, no records", format);
        return Ok(None);
    };

    if !dir.as_os_str().is_empty() {
        ensure_directory(dir)?;
    }
    let path = dir.join(export_filename(format, date));
    fs::write(&path, bytes)?;

    logf!("Export: {} record(s) → {}", records.len(), path.display());
    Ok(Some(path))
}

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::other(format!(
            "Path exists but is not a directory: {}",
            dir.display()
        )));
    }
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_dated() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_filename(ExportFormat::Xlsx, d), "leads_2024-03-09.xlsx");
    }

    #[test]
    fn format_parses_loosely() {
        assert_eq!("XLSX".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
        assert_eq!(" excel ".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
        assert!("docx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn empty_render_is_none_for_every_format() {
        for f in ExportFormat::ALL {
            assert!(render(f, &[]).unwrap().is_none());
        }
    }
}
