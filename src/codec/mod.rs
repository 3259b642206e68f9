//! Format codecs, one module per format.
//!
//! Each codec wraps a third-party parsing or rendering library behind a
//! small decode/encode surface, so the reader and the conversion engine
//! never see library types. Keeping codecs separate makes each
//! independently testable and lets us swap a backing library without
//! touching dispatch.
//!
//! ## Responsibilities
//!
//! | Module     | Decode                                  | Encode                         |
//! |------------|-----------------------------------------|--------------------------------|
//! | [`pdf`]    | text + page count + `/Info` (lopdf)     | paginated A4 layout (printpdf) |
//! | [`docx`]   | flattened text + warnings (zip+quick-xml)| — (not implemented)           |
//! | [`html`]   | body text + title (lol_html)            | minimal-document wrappers      |
//! | [`markdown`]| — (read verbatim)                      | HTML rendering (pulldown-cmark)|

pub mod docx;
pub mod html;
pub mod markdown;
pub mod pdf;
