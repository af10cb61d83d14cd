// src/export/delimited.rs
//
// CSV: bare header row, then every value double-quoted with inner quotes doubled.

use std::io;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::ExportError;
use crate::lead::{Field, LeadRecord};

pub fn header_line() -> String {
    let keys: Vec<&str> = Field::ALL.iter().map(|f| f.key()).collect();
    join!(keys.join(",").as_str(), "\n")
}

pub fn to_bytes(records: &[LeadRecord]) -> Result<Vec<u8>, ExportError> {
    let mut w = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(header_line().into_bytes());

    for rec in records {
        w.write_record(rec.cells())?;
    }
    w.into_inner()
        .map_err(|e| ExportError::Io(io::Error::new(e.error().kind(), e.error().to_string())))
}

/// Same bytes as the file, as text (clipboard).
pub fn to_string(records: &[LeadRecord]) -> Result<String, ExportError> {
    let bytes = to_bytes(records)?;
    // every cell came from a String
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
