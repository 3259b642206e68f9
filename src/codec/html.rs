//! HTML codec: text extraction, Markdown conversion, and the minimal
//! document wrappers used when HTML is the conversion intermediate.
//!
//! Extraction uses lol_html's streaming handlers rather than building a DOM:
//! we only ever need the `<title>` text and the visible body text, and a
//! single pass with two text collectors gets both without materialising a
//! tree. Script and style elements are removed up front so their contents
//! never reach the text collectors.

use crate::document::HtmlMetadata;
use crate::error::ConvertError;
use crate::format::Format;
use lol_html::{element, rewrite_str, text, RewriteStrSettings};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::rc::Rc;

/// Elements that imply a line break in the extracted text flow.
const BLOCK_TAGS: [&str; 11] = [
    "p", "div", "li", "br", "h1", "h2", "h3", "h4", "h5", "h6", "tr",
];

static RE_RUNS_OF_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static RE_EXCESS_BLANKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Extract the visible body text and document title from HTML markup.
///
/// When the markup has no `<body>` element the raw content is returned as
/// text verbatim, so a bare fragment or a plain-text file mislabelled
/// `.html` still yields something useful instead of an empty string.
pub fn extract(html: &str) -> Result<(String, HtmlMetadata), ConvertError> {
    let (body_text, title) = collect_text(html)?;

    let metadata = HtmlMetadata {
        title: non_empty(tidy(&title)),
    };

    if !has_body_element(html) {
        return Ok((html.to_string(), metadata));
    }
    Ok((tidy(&body_text), metadata))
}

/// The visible text of an HTML string, for renderers that need a plain
/// text flow (the paginated PDF target). Fragments without a `<body>` are
/// wrapped first so their tags are still stripped.
pub fn visible_text(html: &str) -> Result<String, ConvertError> {
    if has_body_element(html) {
        let (text, _) = collect_text(html)?;
        Ok(tidy(&text))
    } else {
        let wrapped = format!("<html><body>{html}</body></html>");
        let (text, _) = collect_text(&wrapped)?;
        Ok(tidy(&text))
    }
}

/// Convert HTML markup to Markdown via structural mapping (headings,
/// emphasis, lists, code fences). Unsupported constructs degrade to their
/// text content.
pub fn to_markdown(html: &str) -> Result<String, ConvertError> {
    htmd::convert(html).map_err(|e| ConvertError::Codec {
        format: Format::Html,
        detail: e.to_string(),
    })
}

/// Wrap plain text in a minimal HTML document with a preformatted block,
/// preserving line breaks and spacing exactly.
pub fn wrap_preformatted(text: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n<body>\n<pre>{}</pre>\n</body>\n</html>\n",
        html_escape::encode_text(text)
    )
}

/// Wrap already-flattened text (pdf/docx extractions) in a minimal HTML
/// document as a single paragraph, newlines becoming line breaks.
pub fn wrap_flattened(text: &str) -> String {
    let escaped = html_escape::encode_text(text).replace('\n', "<br>\n");
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n<body>\n<p>{escaped}</p>\n</body>\n</html>\n"
    )
}

// ── Internals ────────────────────────────────────────────────────────────

/// One streaming pass over the markup collecting body text and title.
fn collect_text(html: &str) -> Result<(String, String), ConvertError> {
    let body = Rc::new(RefCell::new(String::new()));
    let title = Rc::new(RefCell::new(String::new()));

    let mut handlers = Vec::new();

    for tag in ["script", "style"] {
        handlers.push(element!(tag, |el| {
            el.remove();
            Ok(())
        }));
    }

    for tag in BLOCK_TAGS {
        let buf = Rc::clone(&body);
        handlers.push(element!(tag, move |_el| {
            buf.borrow_mut().push('\n');
            Ok(())
        }));
    }

    let title_buf = Rc::clone(&title);
    handlers.push(text!("title", move |chunk| {
        title_buf.borrow_mut().push_str(chunk.as_str());
        Ok(())
    }));

    let body_buf = Rc::clone(&body);
    handlers.push(text!("body", move |chunk| {
        body_buf.borrow_mut().push_str(chunk.as_str());
        Ok(())
    }));

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| ConvertError::Codec {
        format: Format::Html,
        detail: e.to_string(),
    })?;

    let body = body.borrow().clone();
    let title = title.borrow().clone();
    Ok((body, title))
}

fn has_body_element(html: &str) -> bool {
    html.to_ascii_lowercase().contains("<body")
}

/// Normalise extracted text: collapse space runs, trim line edges, cap
/// blank runs at one empty line.
fn tidy(text: &str) -> String {
    let collapsed = RE_RUNS_OF_SPACE.replace_all(text, " ");
    let trimmed: String = collapsed
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    RE_EXCESS_BLANKS
        .replace_all(&trimmed, "\n\n")
        .trim()
        .to_string()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
