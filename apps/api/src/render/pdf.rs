//! PDF assembly on top of `pdf-writer`.
//!
//! Object ids are handed out sequentially. The two base fonts are written once and
//! referenced from every page. Page content streams are built by the painter and
//! handed over whole, so a page is never left half-written.

use chrono::{Datelike, Timelike, Utc};
use pdf_writer::{Content, Date, Finish, Name, Pdf, Rect, Ref, TextStr};

use crate::layout::{FontFace, PageGeometry};

const BODY_FONT: Name<'static> = Name(b"F1");
const HEADER_FONT: Name<'static> = Name(b"F2");
const PRODUCER: &str = concat!("sheetpress ", env!("CARGO_PKG_VERSION"));

/// Resource name under which `face` is registered on every page.
pub fn font_resource(face: FontFace) -> Name<'static> {
    match face {
        FontFace::Helvetica => BODY_FONT,
        FontFace::HelveticaBold => HEADER_FONT,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// A finished PDF held in memory.
#[derive(Debug, Clone)]
pub struct Document {
    bytes: Vec<u8>,
    page_count: usize,
}

impl Document {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Physical pages, including continuation pages of chunks that overflowed.
    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

pub struct PdfBuilder {
    pdf: Pdf,
    next_id: i32,
    catalog_id: Ref,
    page_tree_id: Ref,
    body_font_id: Ref,
    header_font_id: Ref,
    page_ids: Vec<Ref>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        let mut builder = PdfBuilder {
            pdf: Pdf::new(),
            next_id: 1,
            catalog_id: Ref::new(1),
            page_tree_id: Ref::new(1),
            body_font_id: Ref::new(1),
            header_font_id: Ref::new(1),
            page_ids: Vec::new(),
        };
        builder.catalog_id = builder.alloc();
        builder.page_tree_id = builder.alloc();
        builder.body_font_id = builder.alloc();
        builder.header_font_id = builder.alloc();

        for (id, face) in [
            (builder.body_font_id, FontFace::Helvetica),
            (builder.header_font_id, FontFace::HelveticaBold),
        ] {
            builder
                .pdf
                .type1_font(id)
                .base_font(Name(face.base_font()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }
        builder
    }

    fn alloc(&mut self) -> Ref {
        let id = Ref::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Appends one page of `geometry`'s size drawing `content`.
    pub fn add_page(&mut self, geometry: &PageGeometry, content: Content) {
        let page_id = self.alloc();
        let content_id = self.alloc();

        let mut page = self.pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, geometry.width, geometry.height));
        page.parent(self.page_tree_id);
        page.contents(content_id);
        page.resources()
            .fonts()
            .pair(BODY_FONT, self.body_font_id)
            .pair(HEADER_FONT, self.header_font_id);
        page.finish();

        self.pdf.stream(content_id, &content.finish());
        self.page_ids.push(page_id);
    }

    /// Writes the catalog, page tree and document info, and serializes the file.
    pub fn finish(mut self) -> Document {
        let page_count = self.page_ids.len();
        let info_id = self.alloc();

        self.pdf.catalog(self.catalog_id).pages(self.page_tree_id);
        self.pdf
            .pages(self.page_tree_id)
            .kids(self.page_ids.iter().copied())
            .count(page_count as i32);

        let now = Utc::now();
        let created = Date::new(now.year() as u16)
            .month(now.month() as u8)
            .day(now.day() as u8)
            .hour(now.hour() as u8)
            .minute(now.minute() as u8)
            .second(now.second() as u8)
            .utc_offset_hour(0);
        self.pdf
            .document_info(info_id)
            .producer(TextStr(PRODUCER))
            .creation_date(created);

        Document {
            bytes: self.pdf.finish(),
            page_count,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Text encoding
// ────────────────────────────────────────────────────────────────────────────

/// Encodes `text` for a WinAnsi base font. Characters with no WinAnsi code become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\t' => b' ',
        ' '..='~' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_ascii_passthrough() {
        assert_eq!(encode_win_ansi("Total: 42"), b"Total: 42".to_vec());
    }

    #[test]
    fn test_encode_latin1_and_specials() {
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("€—"), vec![0x80, 0x97]);
    }

    #[test]
    fn test_encode_unmappable_becomes_question_mark() {
        assert_eq!(encode_win_ansi("漢\u{1}"), b"??".to_vec());
    }

    #[test]
    fn test_builder_emits_pdf_with_pages() {
        let geometry = PageGeometry::reference();
        let mut builder = PdfBuilder::new();
        builder.add_page(&geometry, Content::new());
        builder.add_page(&geometry, Content::new());

        let document = builder.finish();
        assert_eq!(document.page_count(), 2);
        let bytes = document.as_bytes();
        assert!(bytes.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(bytes);
        assert!(text.contains("/Helvetica-Bold"));
        assert!(text.contains("/WinAnsiEncoding"));
        assert!(text.contains("/Count 2"));
    }
}
