//! PDF codec: text extraction with lopdf, generation with printpdf.
//!
//! Decoding pulls the full text of every page plus the `/Info` dictionary.
//! Encoding takes the HTML intermediate, reduces it to its visible text, and
//! lays that out as a paginated A4 document in Helvetica. Both directions are
//! CPU-bound and synchronous; callers run them on a blocking thread.

use crate::codec::html;
use crate::document::{PdfInfo, PdfMetadata};
use crate::error::ConvertError;
use crate::format::Format;
use lopdf::Object;
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem,
};
use tracing::debug;

// A4 portrait with a one-inch margin.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 25.4;

const FONT_SIZE_PT: f32 = 11.0;
const LINE_HEIGHT_PT: f32 = 14.0;

/// Decode a PDF byte buffer into its text content and metadata.
pub fn decode(bytes: &[u8]) -> Result<(String, PdfMetadata), ConvertError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| codec_err(e.to_string()))?;

    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    let page_count = pages.len();

    let text = doc
        .extract_text(&pages)
        .map_err(|e| codec_err(format!("text extraction failed: {e}")))?;

    let info = read_info(&doc);
    debug!(page_count, chars = text.len(), "decoded pdf");

    Ok((text, PdfMetadata { page_count, info }))
}

/// Render the HTML intermediate as a paginated PDF, returning the bytes.
///
/// Markup is reduced to its visible text flow first; the PDF target keeps
/// the words, not the styling.
pub fn encode_html(html: &str, title: Option<&str>) -> Result<Vec<u8>, ConvertError> {
    let text = html::visible_text(html)?;
    Ok(render_text(&text, title.unwrap_or("Converted Document")))
}

// ── Decoding internals ───────────────────────────────────────────────────

/// Read the `/Info` dictionary from the trailer, tolerating its absence and
/// following an indirect reference when present. Anything malformed just
/// yields empty metadata; the text extraction already succeeded.
fn read_info(doc: &lopdf::Document) -> PdfInfo {
    let Ok(info_obj) = doc.trailer.get(b"Info") else {
        return PdfInfo::default();
    };
    let dict = match info_obj {
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Dictionary(d)) => d,
            _ => return PdfInfo::default(),
        },
        Object::Dictionary(d) => d,
        _ => return PdfInfo::default(),
    };

    PdfInfo {
        title: info_string(dict, b"Title"),
        author: info_string(dict, b"Author"),
        subject: info_string(dict, b"Subject"),
        creator: info_string(dict, b"Creator"),
        producer: info_string(dict, b"Producer"),
    }
}

fn info_string(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key) {
        Ok(Object::String(bytes, _)) => {
            let s = String::from_utf8_lossy(bytes).trim().to_string();
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        }
        _ => None,
    }
}

// ── Encoding internals ───────────────────────────────────────────────────

/// Lay text out top-to-bottom in Helvetica, wrapping long lines and breaking
/// pages when the flow reaches the bottom margin.
fn render_text(text: &str, title: &str) -> Vec<u8> {
    let page_w = Mm(PAGE_WIDTH_MM);
    let page_h = Mm(PAGE_HEIGHT_MM);
    let margin_pt = Mm(MARGIN_MM).into_pt().0;
    let page_h_pt = page_h.into_pt().0;

    // Helvetica averages roughly half the font size per glyph; 1pt = 0.3528mm.
    let usable_width_mm = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    let avg_char_width_mm = 0.50 * FONT_SIZE_PT * 0.3528;
    let max_chars = (usable_width_mm / avg_char_width_mm) as usize;

    let usable_height_pt = page_h_pt - 2.0 * margin_pt;
    let lines_per_page = (usable_height_pt / LINE_HEIGHT_PT).max(1.0) as usize;

    let lines = flow_lines(text, max_chars);

    let mut doc = PdfDocument::new(title);
    let mut pages: Vec<PdfPage> = Vec::new();

    for chunk in lines.chunks(lines_per_page) {
        let mut ops: Vec<Op> = Vec::new();
        for (idx, line) in chunk.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let y_pt = page_h_pt - margin_pt - (idx as f32 * LINE_HEIGHT_PT);
            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(margin_pt),
                    y: Pt(y_pt),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(FONT_SIZE_PT),
                font: BuiltinFont::Helvetica,
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(line.clone())],
                font: BuiltinFont::Helvetica,
            });
            ops.push(Op::EndTextSection);
        }
        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    debug!(lines = lines.len(), pages = pages.len(), "pdf layout complete");

    doc.with_pages(pages);
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    doc.save(&PdfSaveOptions::default(), &mut warnings)
}

/// Word-wrap each source line to at most `max_width` characters. Words that
/// exceed the width on their own are broken mid-word.
fn flow_lines(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut out = Vec::new();

    for source_line in text.split('\n') {
        if source_line.trim().is_empty() {
            out.push(String::new());
            continue;
        }

        let mut line = String::with_capacity(max_width);
        for word in source_line.split_whitespace() {
            let mut word = word;
            while word.len() > max_width {
                if !line.is_empty() {
                    out.push(std::mem::take(&mut line));
                }
                let split = floor_char_boundary(word, max_width);
                let (head, tail) = word.split_at(split);
                out.push(head.to_string());
                word = tail;
            }
            if line.is_empty() {
                line.push_str(word);
            } else if line.len() + 1 + word.len() <= max_width {
                line.push(' ');
                line.push_str(word);
            } else {
                out.push(std::mem::take(&mut line));
                line.push_str(word);
            }
        }
        if !line.is_empty() {
            out.push(line);
        }
    }

    out
}

/// Largest char boundary at or below `index` (stable stand-in for
/// `str::floor_char_boundary`).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i.max(1)
}

fn codec_err(detail: String) -> ConvertError {
    ConvertError::Codec {
        format: Format::Pdf,
        detail,
    }
}
