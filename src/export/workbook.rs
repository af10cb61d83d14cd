// src/export/workbook.rs
use rust_xlsxwriter::{Format, Workbook};

use crate::config::consts::SHEET_NAME;
use crate::error::ExportError;
use crate::lead::{Field, LeadRecord};

/// One sheet, header row in bold, one row per record. All cells are text.
pub fn to_bytes(records: &[LeadRecord]) -> Result<Vec<u8>, ExportError> {
    let mut wb = Workbook::new();
    let bold = Format::new().set_bold();

    let ws = wb.add_worksheet();
    ws.set_name(SHEET_NAME)?;

    for (col, field) in Field::ALL.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, field.key(), &bold)?;
    }
    for (i, rec) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, cell) in rec.cells().iter().enumerate() {
            ws.write_string(row, col as u16, *cell)?;
        }
    }
    ws.autofit();

    Ok(wb.save_to_buffer()?)
}
