// tests/export_formats.rs
use std::{collections::HashMap, fs, io::Cursor};

use calamine::{open_workbook_auto_from_rs, Reader};
use chrono::NaiveDate;
use lead_search::{
    config::{consts::DOCUMENT_CAPTION, options::ExportOptions},
    error::ExportError,
    export::{self, ExportFormat},
    lead::{Field, LeadRecord},
};
use printpdf::lopdf;

fn sample() -> Vec<LeadRecord> {
    vec![
        LeadRecord {
            name: "Jane Doe".into(),
            location: "Chicago, \"Loop\"".into(),
            technology: "Rust".into(),
            email: "jane@x.io".into(),
            phone: "555-0100".into(),
        },
        LeadRecord { name: "No Contact".into(), ..Default::default() },
    ]
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
}

#[test]
fn csv_file_is_quoted_and_dated() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested/out");

    let path = export::export_records_on(ExportFormat::Csv, &sample(), &ExportOptions::in_dir(&out), day())
        .unwrap()
        .expect("file written");

    assert_eq!(path, out.join("leads_2025-01-31.csv"));
    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "name,location,technology,email,phone");
    assert_eq!(lines[1], r#""Jane Doe","Chicago, ""Loop""","Rust","jane@x.io","555-0100""#);
    assert_eq!(lines[2], r#""No Contact","","","","""#);
    assert_eq!(lines.len(), 3);
}

#[test]
fn empty_export_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("never");
    for format in ExportFormat::ALL {
        let res = export::export_records_on(format, &[], &ExportOptions::in_dir(&out), day()).unwrap();
        assert!(res.is_none());
    }
    assert!(!out.exists());
}

#[test]
fn xlsx_reads_back_with_the_same_cells() {
    let bytes = export::render(ExportFormat::Xlsx, &sample()).unwrap().unwrap();

    let mut wb = open_workbook_auto_from_rs(Cursor::new(bytes)).unwrap();
    assert_eq!(wb.sheet_names(), vec!["Leads".to_string()]);
    let range = wb.worksheet_range("Leads").unwrap();
    let grid: Vec<Vec<String>> = range
        .rows()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect();

    assert_eq!(grid[0], vec!["name", "location", "technology", "email", "phone"]);
    assert_eq!(grid[1][1], "Chicago, \"Loop\"");
    assert_eq!(grid[2][0], "No Contact");
    assert_eq!(grid.len(), 3);
}

/// Text drawn on each page, one entry per text operation, in drawing
/// order. The PDF carries glyph ids of the main bundled face, so they are
/// mapped back through that face using the characters in `alphabet`.
fn pdf_text(bytes: &[u8], alphabet: &str) -> Vec<Vec<String>> {
    let face = ttf_parser::Face::parse(epaint_default_fonts::UBUNTU_LIGHT, 0).unwrap();
    let mut glyphs: HashMap<u16, char> = HashMap::new();
    for c in alphabet.chars() {
        if let Some(id) = face.glyph_index(c) {
            glyphs.entry(id.0).or_insert(c);
        }
    }

    let doc = lopdf::Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            let content = doc.get_and_decode_page_content(id).unwrap();
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .map(|op| {
                    op.operands[0]
                        .as_str()
                        .unwrap()
                        .chunks(2)
                        .map(|p| u16::from_be_bytes([p[0], p[1]]))
                        .map(|g| glyphs.get(&g).copied().unwrap_or('\u{FFFD}'))
                        .collect::<String>()
                })
                .collect::<Vec<String>>()
        })
        .collect()
}

fn alphabet(records: &[LeadRecord]) -> String {
    let mut text = format!("{DOCUMENT_CAPTION}Page of 0123456789");
    text.extend(Field::ALL.map(|f| f.title()));
    for rec in records {
        text.extend(rec.cells());
    }
    text
}

const LONG_EMAIL: &str = "jane.doe.engineering.department@examplecorporation-international.com";

#[test]
fn pdf_shows_caption_header_and_every_value_in_column_order() {
    let mut records = sample();
    records.push(LeadRecord {
        name: "Łukasz Żółć".into(),
        location: "Москва".into(),
        technology: "Rust, embedded".into(),
        email: LONG_EMAIL.into(),
        phone: "+48 600 100 200".into(),
    });

    let bytes = export::render(ExportFormat::Pdf, &records).unwrap().unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let pages = pdf_text(&bytes, &alphabet(&records));
    assert_eq!(pages.len(), 1);
    let ops = &pages[0];
    assert_eq!(ops[0], DOCUMENT_CAPTION);
    assert_eq!(ops[1..6], Field::ALL.map(|f| s(f.title())));

    // each row draws its cells left to right, so its text is the values back to back
    let text = ops.concat();
    for rec in &records {
        assert!(text.contains(&rec.cells().concat()), "missing {:?}", rec.name);
    }

    // the long email wraps onto several lines instead of being cut
    let pieces: Vec<&String> = ops.iter().filter(|t| LONG_EMAIL.contains(t.as_str()) && t.contains('.')).collect();
    assert!(pieces.len() > 1, "{pieces:?}");
    assert!(!text.contains("..."));
    assert_eq!(ops.last().map(String::as_str), Some("Page 1 of 1"));
}

#[test]
fn pdf_paginates_with_header_and_footer_on_every_page() {
    let many: Vec<LeadRecord> = (0..200)
        .map(|i| LeadRecord { name: format!("Lead {i}"), ..Default::default() })
        .collect();
    let bytes = export::render(ExportFormat::Pdf, &many).unwrap().unwrap();

    let pages = pdf_text(&bytes, &alphabet(&many));
    let total = pages.len();
    assert!(total > 1);

    let mut names = Vec::new();
    for (i, ops) in pages.iter().enumerate() {
        let header_at = if i == 0 { 1 } else { 0 };
        assert_eq!(ops[header_at], "Name");
        assert_eq!(ops.last(), Some(&format!("Page {} of {}", i + 1, total)));
        names.extend(ops.iter().filter(|t| t.starts_with("Lead ") && *t != DOCUMENT_CAPTION).cloned());
    }
    assert_eq!(names, many.iter().map(|r| r.name.clone()).collect::<Vec<_>>());
}

#[test]
fn pdf_refuses_characters_no_font_covers() {
    let records = vec![LeadRecord { name: "王芳".into(), ..Default::default() }];
    let err = export::render(ExportFormat::Pdf, &records).unwrap_err();
    assert!(matches!(err, ExportError::MissingGlyph { ch: '王', .. }));

    // CSV has no such limit
    assert!(export::render(ExportFormat::Csv, &records).unwrap().is_some());
}

fn s(text: &str) -> String {
    text.to_string()
}

#[test]
fn export_dir_that_is_a_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, "x").unwrap();

    let err = export::export_records_on(ExportFormat::Csv, &sample(), &ExportOptions::in_dir(&blocker), day());
    assert!(err.is_err());
}
