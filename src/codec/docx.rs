//! DOCX codec: flattened plain-text extraction.
//!
//! A `.docx` file is a zip archive; the main document body lives in
//! `word/document.xml` as WordprocessingML. We stream that XML and keep only
//! the text runs (`w:t`), emitting a newline per paragraph end and per
//! explicit break. Structure the flat text cannot represent is reported as
//! a warning rather than silently dropped.

use crate::document::DocxMetadata;
use crate::error::ConvertError;
use crate::format::Format;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

const DOCUMENT_XML: &str = "word/document.xml";

/// Decode a DOCX byte buffer into flattened text plus extraction warnings.
pub fn decode(bytes: &[u8]) -> Result<(String, DocxMetadata), ConvertError> {
    let xml = read_document_xml(bytes)?;
    flatten_document_xml(&xml)
}

/// Pull `word/document.xml` out of the zip container.
fn read_document_xml(bytes: &[u8]) -> Result<String, ConvertError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| codec_err(e.to_string()))?;
    let mut entry = archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| codec_err(format!("missing {DOCUMENT_XML}: {e}")))?;
    let mut xml = String::with_capacity(entry.size() as usize);
    entry
        .read_to_string(&mut xml)
        .map_err(|e| codec_err(format!("reading {DOCUMENT_XML}: {e}")))?;
    Ok(xml)
}

/// Walk the WordprocessingML event stream collecting run text.
///
/// Only text inside `w:t` elements counts; everything else in the body is
/// markup. Paragraph ends become newlines, `w:br` a newline, `w:tab` a tab.
fn flatten_document_xml(xml: &str) -> Result<(String, DocxMetadata), ConvertError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut warnings = Warnings::default();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = true,
                b"tbl" => warnings.table(),
                b"drawing" | b"pict" => warnings.graphic(),
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"br" => text.push('\n'),
                b"tab" => text.push('\t'),
                b"drawing" | b"pict" => warnings.graphic(),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let chunk = t
                    .unescape()
                    .map_err(|e| codec_err(format!("malformed text run: {e}")))?;
                text.push_str(&chunk);
            }
            Ok(Event::Text(_)) => {}
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(codec_err(format!("malformed document XML: {e}"))),
        }
    }

    Ok((text, DocxMetadata {
        warnings: warnings.into_vec(),
    }))
}

fn codec_err(detail: String) -> ConvertError {
    ConvertError::Codec {
        format: Format::Docx,
        detail,
    }
}

/// Deduplicated warning collector: one message per kind of loss, not one
/// per occurrence, so a hundred-table report stays readable.
#[derive(Default)]
struct Warnings {
    saw_table: bool,
    saw_graphic: bool,
}

impl Warnings {
    fn table(&mut self) {
        self.saw_table = true;
    }

    fn graphic(&mut self) {
        self.saw_graphic = true;
    }

    fn into_vec(self) -> Vec<String> {
        let mut out = Vec::new();
        if self.saw_table {
            out.push("table content flattened to plain text".to_string());
        }
        if self.saw_graphic {
            out.push("embedded graphics skipped".to_string());
        }
        out
    }
}
