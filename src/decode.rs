// src/decode.rs
//
// Spreadsheet decoder: file bytes (or a data URI) → ordered RawRows.
//
// - CSV / TSV go through the `csv` crate (flexible widths, lossy UTF-8).
// - XLS / XLSX / XLSB / ODS go through calamine; first sheet only.
// - First non-blank row is the header row. Blank headers become "Column N".
// - Every row carries every header; short rows are padded with "".
// - Fully blank data rows are dropped.

use std::io::Cursor;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use calamine::{open_workbook_auto_from_rs, Reader};

use crate::error::DecodeError;
use crate::lead::RawRow;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SheetKind {
    Csv,
    Tsv,
    Workbook,
}

impl SheetKind {
    /// Spreadsheet kind from extension first, then MIME type.
    /// `None` means "not a spreadsheet": forward it, don't parse it.
    ///
    /// Extension wins because browsers and OSes label `.csv` files as
    /// `application/vnd.ms-excel` often enough to matter.
    pub fn detect(mime: &str, file_name: &str) -> Option<Self> {
        Self::from_extension(file_name).or_else(|| Self::from_mime(mime))
    }

    pub fn from_extension(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())?
            .to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(SheetKind::Csv),
            "tsv" | "tab" => Some(SheetKind::Tsv),
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Some(SheetKind::Workbook),
            _ => None,
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "text/csv" | "application/csv" | "text/comma-separated-values" => Some(SheetKind::Csv),
            "text/tab-separated-values" => Some(SheetKind::Tsv),
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.ms-excel.sheet.macroenabled.12"
            | "application/vnd.ms-excel.sheet.binary.macroenabled.12"
            | "application/vnd.oasis.opendocument.spreadsheet" => Some(SheetKind::Workbook),
            _ => None,
        }
    }
}

/* ---------------- Data URI ---------------- */

/// Drop a leading `data:<mime>;base64,` prefix if there is one.
pub fn strip_data_uri(payload: &str) -> &str {
    let payload = payload.trim();
    match payload.find(',') {
        Some(i) if payload[..i].starts_with("data:") => &payload[i + 1..],
        _ => payload,
    }
}

/// MIME type declared in a data URI prefix, if any.
pub fn data_uri_mime(payload: &str) -> Option<&str> {
    let head = payload.trim().strip_prefix("data:")?;
    let head = &head[..head.find(',')?];
    let mime = head.split(';').next().unwrap_or("");
    if mime.is_empty() { None } else { Some(mime) }
}

/// Base64 payload (with or without data URI prefix) → bytes.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, DecodeError> {
    let body: String = strip_data_uri(payload)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    Ok(STANDARD.decode(body)?)
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/* ---------------- Decoding ---------------- */

pub fn decode_data_uri(payload: &str, kind: SheetKind) -> Result<Vec<RawRow>, DecodeError> {
    let bytes = decode_payload(payload)?;
    decode_bytes(&bytes, kind)
}

pub fn decode_bytes(bytes: &[u8], kind: SheetKind) -> Result<Vec<RawRow>, DecodeError> {
    let rows = match kind {
        SheetKind::Csv => decode_delimited(bytes, b',')?,
        SheetKind::Tsv => decode_delimited(bytes, b'\t')?,
        SheetKind::Workbook => decode_workbook(bytes)?,
    };
    logd!("Decode: {:?} → {} row(s)", kind, rows.len());
    Ok(rows)
}

fn decode_delimited(bytes: &[u8], delim: u8) -> Result<Vec<RawRow>, DecodeError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delim)
        .from_reader(bytes);

    let mut grid: Vec<Vec<String>> = Vec::new();
    for rec in rdr.byte_records() {
        let rec = rec?;
        grid.push(rec.iter().map(|c| String::from_utf8_lossy(c).into_owned()).collect());
    }
    Ok(rows_from_grid(grid))
}

fn decode_workbook(bytes: &[u8]) -> Result<Vec<RawRow>, DecodeError> {
    let mut wb = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| DecodeError::Workbook(e.to_string()))?;

    let range = wb
        .worksheet_range_at(0)
        .ok_or(DecodeError::NoSheets)?
        .map_err(|e| DecodeError::Workbook(e.to_string()))?;

    // Data's Display renders Empty as "" and whole floats without ".0"
    let grid: Vec<Vec<String>> = range
        .rows()
        .map(|r| r.iter().map(|c| c.to_string()).collect::<Vec<String>>())
        .collect();
    Ok(rows_from_grid(grid))
}

fn is_blank(cells: &[String]) -> bool {
    cells.iter().all(|c| c.trim().is_empty())
}

/// Header row + data rows → RawRows keyed by header.
pub fn rows_from_grid(grid: Vec<Vec<String>>) -> Vec<RawRow> {
    let mut it = grid.into_iter().skip_while(|r| is_blank(r));
    let Some(header_row) = it.next() else { return Vec::new() };

    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = h.trim();
            if h.is_empty() { format!("Column {}", i + 1) } else { s!(h) }
        })
        .collect();

    it.filter(|r| !is_blank(r))
        .map(|r| {
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.clone(), r.get(i).cloned().unwrap_or_default()))
                .collect::<RawRow>()
        })
        .collect()
}
