//! Markdown rendering: CommonMark text → HTML fragment.
//!
//! Tables, strikethrough, and footnotes are enabled beyond plain CommonMark
//! because real-world Markdown (GitHub flavoured) uses them constantly and
//! rendering them as literal text would be a silent fidelity loss.

use pulldown_cmark::{html, Options, Parser};

/// Render Markdown to an HTML fragment.
///
/// The output is a fragment, not a full document; callers that need a
/// standalone page (or a printable intermediate) wrap it themselves.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
