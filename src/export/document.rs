// src/export/document.rs
//
// PDF table: A4 landscape, caption on page one, column header on every
// page, footer with page numbers.
//
// Text is set in embedded TrueType faces, tried in order per character,
// so a value prints exactly as the table shows it. Long cells wrap inside
// their column and the row grows to fit. A row taller than a whole page
// continues on the next one. A character no face covers is an error,
// never a silent gap.

use std::{borrow::Cow, fs, path::Path};

use printpdf::{IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use ttf_parser::Face;

use crate::config::consts::DOCUMENT_CAPTION;
use crate::error::ExportError;
use crate::lead::{Field, LeadRecord};

const PAGE_W: f32 = 297.0;
const PAGE_H: f32 = 210.0;
const MARGIN: f32 = 15.0;
const LINE: f32 = 5.0;
const CAPTION_PT: f32 = 16.0;
const HEADER_PT: f32 = 10.0;
const BODY_PT: f32 = 9.0;

/// Gap kept between a cell's text and the next column.
const PAD: f32 = 2.0;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Column widths (mm), `Field::ALL` order. Sums to the printable width.
const WIDTHS: [f32; 5] = [55.0, 50.0, 50.0, 67.0, 45.0];

/* ---------- fonts ---------- */

/// TrueType faces, in the order they are tried for each character.
pub struct FontSet {
    faces: Vec<Cow<'static, [u8]>>,
}

impl FontSet {
    /// The faces the results table is drawn with.
    pub fn bundled() -> Self {
        Self {
            faces: vec![
                Cow::Borrowed(epaint_default_fonts::UBUNTU_LIGHT),
                Cow::Borrowed(epaint_default_fonts::NOTO_EMOJI_REGULAR),
                Cow::Borrowed(epaint_default_fonts::EMOJI_ICON),
            ],
        }
    }

    /// Bundled faces, with `extra` tried right after the main one.
    pub fn with_extra(extra: Option<&Path>) -> Result<Self, ExportError> {
        let mut set = Self::bundled();
        let Some(path) = extra else {
            return Ok(set);
        };

        let font_err = |reason: String| ExportError::Font { path: path.to_path_buf(), reason };
        let bytes = fs::read(path).map_err(|e| font_err(e.to_string()))?;
        Face::parse(&bytes, 0).map_err(|e| font_err(e.to_string()))?;

        logd!("Export: PDF font {}", path.display());
        set.faces.insert(1, Cow::Owned(bytes));
        Ok(set)
    }

    fn len(&self) -> usize {
        self.faces.len()
    }
}

/// Character lookup and measuring over a parsed `FontSet`.
struct Shaper<'a> {
    faces: Vec<Face<'a>>,
}

/// A same-face piece of one line, `x` mm from the line start.
#[derive(Debug)]
struct Run {
    face: usize,
    x: f32,
    text: String,
}

impl<'a> Shaper<'a> {
    fn new(set: &'a FontSet) -> Result<Self, ExportError> {
        let faces = set
            .faces
            .iter()
            .map(|bytes| Face::parse(bytes, 0))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ExportError::Document(format!("unreadable font: {e}")))?;
        Ok(Self { faces })
    }

    /// First face with a glyph for `c`, and its advance in mm.
    fn glyph(&self, c: char, size: f32) -> Result<(usize, f32), ExportError> {
        // control characters have nothing to draw
        if c.is_control() {
            return Ok((0, 0.0));
        }
        for (i, face) in self.faces.iter().enumerate() {
            if let Some(id) = face.glyph_index(c) {
                let units = face.glyph_hor_advance(id).unwrap_or(0) as f32;
                return Ok((i, units / face.units_per_em() as f32 * size * MM_PER_PT));
            }
        }
        Err(ExportError::MissingGlyph { ch: c, code: c as u32 })
    }

    fn runs(&self, text: &str, size: f32) -> Result<Vec<Run>, ExportError> {
        let mut runs: Vec<Run> = Vec::new();
        let mut x = 0.0;
        for c in text.chars() {
            let (face, adv) = self.glyph(c, size)?;
            match runs.last_mut() {
                Some(run) if run.face == face => run.text.push(c),
                _ => runs.push(Run { face, x, text: s!(c) }),
            }
            x += adv;
        }
        Ok(runs)
    }

    fn width(&self, text: &str, size: f32) -> Result<f32, ExportError> {
        text.chars().map(|c| self.glyph(c, size).map(|(_, adv)| adv)).sum()
    }

    /// Break `text` into lines no wider than `width` mm, at whitespace when
    /// the line has any, else mid-word. The lines concatenate back to `text`
    /// minus its own line breaks, which always end a line.
    fn wrap(&self, text: &str, width: f32, size: f32) -> Result<Vec<String>, ExportError> {
        let mut lines = Vec::new();

        for para in text.split('\n') {
            let para = para.strip_suffix('\r').unwrap_or(para);
            let mut line = String::new();
            let mut used = 0.0;
            // byte offset just past the last whitespace in `line`, and the width up to it
            let mut brk: Option<(usize, f32)> = None;

            for c in para.chars() {
                let (_, adv) = self.glyph(c, size)?;
                while used + adv > width && !line.is_empty() {
                    match brk.take() {
                        Some((at, w)) if at < line.len() => {
                            let rest = line.split_off(at);
                            lines.push(std::mem::replace(&mut line, rest));
                            used -= w;
                        }
                        _ => {
                            lines.push(std::mem::take(&mut line));
                            used = 0.0;
                        }
                    }
                }
                line.push(c);
                used += adv;
                if c.is_whitespace() {
                    brk = Some((line.len(), used));
                }
            }
            lines.push(line);
        }
        Ok(lines)
    }
}

/// Faces go into the PDF the first time a run needs them.
struct Embedded<'a> {
    doc: &'a PdfDocumentReference,
    set: &'a FontSet,
    refs: Vec<Option<IndirectFontRef>>,
}

impl<'a> Embedded<'a> {
    fn new(doc: &'a PdfDocumentReference, set: &'a FontSet) -> Self {
        Self { doc, set, refs: vec![None; set.len()] }
    }

    fn get(&mut self, face: usize) -> Result<IndirectFontRef, ExportError> {
        if let Some(font) = &self.refs[face] {
            return Ok(font.clone());
        }
        let font = self.doc.add_external_font(&self.set.faces[face][..]).map_err(doc_err)?;
        self.refs[face] = Some(font.clone());
        Ok(font)
    }
}

/* ---------- layout ---------- */

/// The part of one record that lands on a page: baseline of its top line,
/// then each cell's lines in `Field::ALL` order.
#[derive(Debug, Clone, PartialEq)]
struct RowSlice {
    y: f32,
    cells: [Vec<String>; 5],
}

#[derive(Debug, Default)]
struct PageLayout {
    rows: Vec<RowSlice>,
    used: usize,
}

/// Baseline of the column header. Page one gives two lines to the caption.
fn header_y(first: bool) -> f32 {
    let top = PAGE_H - MARGIN;
    if first { top - 2.0 * LINE } else { top }
}

/// Body lines that fit between the header and the bottom margin.
fn capacity(first: bool) -> usize {
    ((header_y(first) - LINE - MARGIN) / LINE) as usize + 1
}

fn layout(records: &[LeadRecord], shaper: &Shaper) -> Result<Vec<PageLayout>, ExportError> {
    let mut pages = vec![PageLayout::default()];

    for rec in records {
        let mut wrapped: [Vec<String>; 5] = Default::default();
        for ((slot, cell), width) in wrapped.iter_mut().zip(rec.cells()).zip(WIDTHS) {
            *slot = shaper.wrap(cell, width - PAD, BODY_PT)?;
        }
        let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);

        let mut done = 0;
        while done < height {
            let first = pages.len() == 1;
            let Some(page) = pages.last_mut() else { break };
            let room = capacity(first) - page.used;
            let left = height - done;

            // a row that fits on a fresh page is never split
            if room == 0 || (room < left && !page.rows.is_empty() && left <= capacity(false)) {
                pages.push(PageLayout::default());
                continue;
            }

            let take = room.min(left);
            let cells: [Vec<String>; 5] = wrapped.each_ref().map(|lines| lines.iter().skip(done).take(take).cloned().collect());
            let y = header_y(first) - LINE * (1 + page.used) as f32;
            page.rows.push(RowSlice { y, cells });
            page.used += take;
            done += take;
        }
    }
    Ok(pages)
}

/* ---------- render ---------- */

pub fn to_bytes_with(records: &[LeadRecord], fonts: &FontSet) -> Result<Vec<u8>, ExportError> {
    let shaper = Shaper::new(fonts)?;
    let pages = layout(records, &shaper)?;
    let total = pages.len();

    let (doc, page, layer) = PdfDocument::new(DOCUMENT_CAPTION, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    let mut embedded = Embedded::new(&doc, fonts);
    let mut pen = Pen { shaper: &shaper, fonts: &mut embedded };

    for (i, pg) in pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(page).get_layer(layer)
        } else {
            let (p, l) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
            doc.get_page(p).get_layer(l)
        };

        if i == 0 {
            pen.text(&layer, DOCUMENT_CAPTION, CAPTION_PT, MARGIN, PAGE_H - MARGIN)?;
        }

        let mut x = MARGIN;
        for (field, width) in Field::ALL.iter().zip(WIDTHS) {
            pen.text(&layer, field.title(), HEADER_PT, x, header_y(i == 0))?;
            x += width;
        }

        for row in &pg.rows {
            let mut x = MARGIN;
            for (lines, width) in row.cells.iter().zip(WIDTHS) {
                for (n, line) in lines.iter().enumerate() {
                    pen.text(&layer, line, BODY_PT, x, row.y - LINE * n as f32)?;
                }
                x += width;
            }
        }

        let footer = format!("Page {} of {}", i + 1, total);
        let fx = PAGE_W - MARGIN - shaper.width(&footer, BODY_PT)?;
        pen.text(&layer, &footer, BODY_PT, fx, MARGIN / 2.0)?;
    }

    logd!("Export: PDF {} page(s), {} face(s) embedded", total, embedded.refs.iter().flatten().count());
    doc.save_to_bytes().map_err(doc_err)
}

struct Pen<'a, 'b> {
    shaper: &'a Shaper<'a>,
    fonts: &'a mut Embedded<'b>,
}

impl Pen<'_, '_> {
    fn text(&mut self, layer: &PdfLayerReference, text: &str, size: f32, x: f32, y: f32) -> Result<(), ExportError> {
        for run in self.shaper.runs(text, size)? {
            let font = self.fonts.get(run.face)?;
            layer.use_text(run.text, size, Mm(x + run.x), Mm(y), &font);
        }
        Ok(())
    }
}

fn doc_err(e: printpdf::Error) -> ExportError {
    ExportError::Document(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMAIL: &str = "jane.doe.engineering@examplecorporation.com";

    fn rec(name: &str) -> LeadRecord {
        LeadRecord { name: s!(name), ..Default::default() }
    }

    #[test]
    fn long_cell_wraps_without_losing_characters() {
        let set = FontSet::bundled();
        let shaper = Shaper::new(&set).unwrap();
        let width = WIDTHS[3] - PAD;

        let long = EMAIL.repeat(2);
        let lines = shaper.wrap(&long, width, BODY_PT).unwrap();
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), long);
        for line in &lines {
            assert!(shaper.width(line, BODY_PT).unwrap() <= width + 1e-3);
        }
    }

    #[test]
    fn wrap_breaks_after_whitespace() {
        let set = FontSet::bundled();
        let shaper = Shaper::new(&set).unwrap();
        let text = "Senior platform engineer with embedded and distributed systems background";

        let lines = shaper.wrap(text, 30.0, BODY_PT).unwrap();
        assert!(lines.len() > 2);
        assert_eq!(lines.concat(), text);
        for line in &lines[..lines.len() - 1] {
            assert!(line.ends_with(' '), "{line:?}");
        }
    }

    #[test]
    fn line_breaks_in_a_cell_start_new_lines() {
        let set = FontSet::bundled();
        let shaper = Shaper::new(&set).unwrap();
        assert_eq!(shaper.wrap("a\nb\r\nc", 50.0, BODY_PT).unwrap(), vec!["a", "b", "c"]);
        assert_eq!(shaper.wrap("", 50.0, BODY_PT).unwrap(), vec![""]);
    }

    #[test]
    fn accented_and_cyrillic_names_have_glyphs() {
        let set = FontSet::bundled();
        let shaper = Shaper::new(&set).unwrap();
        for name in ["Łukasz Żółć", "Zoë Ørsted", "Зоя Петрова", "Ελένη"] {
            let runs = shaper.runs(name, BODY_PT).unwrap();
            assert_eq!(runs.iter().map(|r| r.text.as_str()).collect::<String>(), name);
        }
    }

    #[test]
    fn uncovered_character_is_an_error_not_a_gap() {
        let recs = vec![rec("李小龍")];
        match to_bytes_with(&recs, &FontSet::bundled()) {
            Err(ExportError::MissingGlyph { ch, code }) => {
                assert_eq!(ch, '李');
                assert_eq!(code, 0x674E);
            }
            other => panic!("expected a missing glyph, got {:?}", other.map(|b| b.len())),
        }
    }

    #[test]
    fn extra_font_must_be_a_font() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-font.ttf");
        fs::write(&path, b"plain text").unwrap();

        assert!(matches!(FontSet::with_extra(Some(path.as_path())), Err(ExportError::Font { .. })));
        assert!(matches!(
            FontSet::with_extra(Some(dir.path().join("missing.ttf").as_path())),
            Err(ExportError::Font { .. })
        ));
        assert_eq!(FontSet::with_extra(None).unwrap().len(), FontSet::bundled().len());
    }

    #[test]
    fn pages_keep_every_record_once() {
        let set = FontSet::bundled();
        let shaper = Shaper::new(&set).unwrap();
        let recs: Vec<LeadRecord> = (0..70).map(|i| rec(&format!("Lead {i}"))).collect();

        let pages = layout(&recs, &shaper).unwrap();
        assert!(pages.len() > 1);
        let names: Vec<&str> = pages
            .iter()
            .flat_map(|p| p.rows.iter().map(|r| r.cells[0][0].as_str()))
            .collect();
        assert_eq!(names, recs.iter().map(|r| r.name.as_str()).collect::<Vec<_>>());
        assert!(pages[0].rows.len() < pages[1].rows.len());
    }

    #[test]
    fn row_that_fits_a_fresh_page_moves_whole() {
        let set = FontSet::bundled();
        let shaper = Shaper::new(&set).unwrap();
        let mut recs: Vec<LeadRecord> = (0..capacity(true) - 1).map(|i| rec(&format!("Lead {i}"))).collect();
        recs.push(rec("a\nb\nc"));

        let pages = layout(&recs, &shaper).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].rows[0].cells[0], vec!["a", "b", "c"]);
        assert_eq!(pages[1].rows[0].y, header_y(false) - LINE);
    }

    #[test]
    fn row_taller_than_a_page_continues() {
        let set = FontSet::bundled();
        let shaper = Shaper::new(&set).unwrap();
        let tall = (0..capacity(false) + 5).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let recs = vec![LeadRecord { location: tall.clone(), ..rec("Tall") }];

        let pages = layout(&recs, &shaper).unwrap();
        assert_eq!(pages.len(), 2);
        let lines: Vec<String> = pages.iter().flat_map(|p| p.rows[0].cells[1].clone()).collect();
        assert_eq!(lines.join("\n"), tall);
        // the name sits on the first slice only
        assert_eq!(pages[0].rows[0].cells[0], vec!["Tall"]);
        assert!(pages[1].rows[0].cells[0].is_empty());
    }
}
