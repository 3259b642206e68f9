//! End-to-end tests over the public API.
//!
//! Every test is hermetic: inputs are written into a fresh temp directory
//! and outputs land in a temp output directory, so tests can run in
//! parallel and leave nothing behind.

use docshift::{
    batch_convert, convert_bytes, convert_document, document_info, ConversionConfig, ConvertError,
    DocMetadata, FilePattern, Format,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Config whose output directory lives inside the given temp dir.
fn test_config(tmp: &TempDir) -> ConversionConfig {
    ConversionConfig::builder()
        .output_directory(tmp.path().join("out"))
        .build()
        .unwrap()
}

fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// A minimal but well-formed docx built in memory.
fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{body}</w:body>
</w:document>"#
    );

    let mut cursor = std::io::Cursor::new(Vec::new());
    let mut zip = zip::ZipWriter::new(&mut cursor);
    zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap();
    cursor.into_inner()
}

// ── Single-document conversion ───────────────────────────────────────────

#[tokio::test]
async fn markdown_to_html_file() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let input = write_file(tmp.path(), "notes.md", b"# Title\n\nBody text.\n");

    let dest = convert_document(&input, Format::Html, None, &config)
        .await
        .unwrap();

    assert_eq!(dest, tmp.path().join("out").join("notes.html"));
    let html = std::fs::read_to_string(&dest).unwrap();
    assert!(html.contains("<h1>Title</h1>"), "got: {html}");
    assert!(html.contains("<p>Body text.</p>"), "got: {html}");
}

#[tokio::test]
async fn markdown_identity_is_byte_exact() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let content = b"# Title\n\n- one\n- two\n\n**bold** tail\n";
    let input = write_file(tmp.path(), "same.md", content);

    let dest = convert_document(&input, Format::Markdown, None, &config)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), content.to_vec());
}

#[tokio::test]
async fn markdown_round_trips_through_html() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let input = write_file(
        tmp.path(),
        "doc.md",
        b"# Heading\n\nSome **bold** words.\n\n## Details\n",
    );

    let html_path = convert_document(&input, Format::Html, None, &config)
        .await
        .unwrap();
    let back = convert_document(&html_path, Format::Markdown, None, &config)
        .await
        .unwrap();

    let md = std::fs::read_to_string(&back).unwrap();
    assert!(md.contains("# Heading"), "got: {md}");
    assert!(md.contains("## Details"), "got: {md}");
    assert!(md.contains("**bold**"), "got: {md}");
}

#[tokio::test]
async fn text_to_html_preserves_lines_in_pre() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let input = write_file(tmp.path(), "plain.txt", b"Hello\nWorld");

    let dest = convert_document(&input, Format::Html, None, &config)
        .await
        .unwrap();

    let html = std::fs::read_to_string(&dest).unwrap();
    assert!(html.contains("<pre>Hello\nWorld</pre>"), "got: {html}");
}

#[tokio::test]
async fn html_to_text_strips_markup() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let input = write_file(
        tmp.path(),
        "page.html",
        b"<html><head><title>T</title></head>\
          <body><h1>Header</h1><p>First.</p><p>Second.</p></body></html>",
    );

    let dest = convert_document(&input, Format::Text, None, &config)
        .await
        .unwrap();

    let text = std::fs::read_to_string(&dest).unwrap();
    assert!(text.contains("Header"));
    assert!(text.contains("First."));
    assert!(text.contains("Second."));
    assert!(!text.contains('<'), "got: {text}");
}

#[tokio::test]
async fn markdown_to_pdf_produces_pdf_file() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let input = write_file(tmp.path(), "paper.md", b"# Paper\n\nA paragraph of prose.\n");

    let dest = convert_document(&input, Format::Pdf, None, &config)
        .await
        .unwrap();

    let bytes = std::fs::read(&dest).unwrap();
    assert!(bytes.starts_with(b"%PDF"), "missing pdf header");
}

#[tokio::test]
async fn docx_source_converts_to_text() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let input = write_file(tmp.path(), "letter.docx", &docx_bytes(&["Dear reader,", "Goodbye."]));

    let dest = convert_document(&input, Format::Text, None, &config)
        .await
        .unwrap();

    let text = std::fs::read_to_string(&dest).unwrap();
    assert!(text.contains("Dear reader,"));
    assert!(text.contains("Goodbye."));
}

#[tokio::test]
async fn explicit_output_path_wins_over_output_directory() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let input = write_file(tmp.path(), "notes.md", b"hello\n");
    let explicit = tmp.path().join("elsewhere").join("custom.html");

    let dest = convert_document(&input, Format::Html, Some(&explicit), &config)
        .await
        .unwrap();

    assert_eq!(dest, explicit);
    assert!(explicit.exists());
    assert!(!tmp.path().join("out").join("notes.html").exists());
}

// ── Gates and error paths ────────────────────────────────────────────────

#[tokio::test]
async fn size_limit_applies_before_decoding() {
    let tmp = TempDir::new().unwrap();
    let config = ConversionConfig::builder()
        .max_file_size(8)
        .output_directory(tmp.path().join("out"))
        .build()
        .unwrap();
    // Garbage pdf bytes: if the codec ran first this would be a Codec error.
    let input = write_file(tmp.path(), "big.pdf", b"not a pdf but over the limit");

    let err = convert_document(&input, Format::Text, None, &config)
        .await
        .unwrap_err();
    assert!(
        matches!(err, ConvertError::SizeLimitExceeded { size, limit, .. }
            if size > limit && limit == 8),
        "got: {err}"
    );
}

#[tokio::test]
async fn unknown_extension_is_unsupported_format() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let input = write_file(tmp.path(), "sheet.xlsx", b"whatever");

    let err = convert_document(&input, Format::Text, None, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedFormat { .. }), "got: {err}");
}

#[tokio::test]
async fn missing_input_is_file_not_found() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);

    let err = convert_document(&tmp.path().join("ghost.md"), Format::Html, None, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::FileNotFound { .. }), "got: {err}");
}

#[tokio::test]
async fn docx_target_is_not_implemented() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let input = write_file(tmp.path(), "notes.md", b"hello\n");

    let err = convert_document(&input, Format::Docx, None, &config)
        .await
        .unwrap_err();
    assert!(
        matches!(
            err,
            ConvertError::ConversionNotImplemented {
                target: Format::Docx
            }
        ),
        "got: {err}"
    );
}

#[tokio::test]
async fn excluded_output_format_is_rejected_before_reading() {
    let tmp = TempDir::new().unwrap();
    let config = ConversionConfig::builder()
        .output_formats([Format::Html])
        .output_directory(tmp.path().join("out"))
        .build()
        .unwrap();
    // Input does not even exist; the output gate fires first.
    let err = convert_document(&tmp.path().join("ghost.md"), Format::Pdf, None, &config)
        .await
        .unwrap_err();
    assert!(
        matches!(err, ConvertError::UnsupportedOutputFormat { format: Format::Pdf }),
        "got: {err}"
    );
}

#[tokio::test]
async fn convert_bytes_round_trip_without_files() {
    let config = ConversionConfig::default();
    let out = convert_bytes(b"# In memory\n", Format::Markdown, Format::Html, &config)
        .await
        .unwrap();
    assert!(out.as_text().unwrap().contains("<h1>In memory</h1>"));
}

// ── document_info ────────────────────────────────────────────────────────

#[tokio::test]
async fn info_reports_format_sizes_and_metadata() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let input = write_file(
        tmp.path(),
        "page.html",
        b"<html><head><title>About</title></head><body><p>x</p></body></html>",
    );

    let info = document_info(&input, &config).await.unwrap();
    assert_eq!(info.format, Format::Html);
    assert!(info.size_kb > 0.0);
    assert!(info.content_length > 0);
    assert!(info.last_modified.is_some());
    match info.metadata {
        DocMetadata::Html(m) => assert_eq!(m.title.as_deref(), Some("About")),
        other => panic!("wrong metadata: {other:?}"),
    }
}

#[tokio::test]
async fn info_reports_docx_warnings() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);

    let mut cursor = std::io::Cursor::new(Vec::new());
    let mut zip = zip::ZipWriter::new(&mut cursor);
    zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(
        br#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body><w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl></w:body>
</w:document>"#,
    )
    .unwrap();
    zip.finish().unwrap();
    let input = write_file(tmp.path(), "tables.docx", &cursor.into_inner());

    let info = document_info(&input, &config).await.unwrap();
    match info.metadata {
        DocMetadata::Docx(m) => {
            assert_eq!(m.warnings.len(), 1);
            assert!(m.warnings[0].contains("table"));
        }
        other => panic!("wrong metadata: {other:?}"),
    }
}

// ── Batch conversion ─────────────────────────────────────────────────────

#[tokio::test]
async fn batch_tolerates_per_file_failures() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let dir = tmp.path().join("in");
    std::fs::create_dir(&dir).unwrap();
    write_file(&dir, "a_good.md", b"# A\n");
    write_file(&dir, "b_bad.docx", b"this is not a zip archive");
    write_file(&dir, "c_good.md", b"# C\n");

    let result = batch_convert(&dir, Format::Html, None, &config)
        .await
        .unwrap();

    assert_eq!(result.total(), 3);
    assert_eq!(result.converted(), 2);
    assert_eq!(result.failed(), 1);

    // Results are in name order; the failure sits between the successes.
    assert!(result.outcomes[0].is_converted());
    assert!(!result.outcomes[1].is_converted());
    assert!(result.outcomes[2].is_converted());

    // The file after the failure really was written.
    assert!(tmp.path().join("out").join("c_good.html").exists());

    let report = result.report(Format::Html);
    assert!(report.contains("Converted 2/3 files to html (1 failed)"), "got: {report}");
    assert!(report.contains("✓ a_good.md"), "got: {report}");
    assert!(report.contains("✗ b_bad.docx"), "got: {report}");
}

#[tokio::test]
async fn batch_pattern_filters_inputs() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let dir = tmp.path().join("in");
    std::fs::create_dir(&dir).unwrap();
    write_file(&dir, "keep.md", b"# K\n");
    write_file(&dir, "skip.txt", b"nope");
    write_file(&dir, "also_keep.md", b"# A\n");

    let pattern = FilePattern::compile("*.md").unwrap();
    let result = batch_convert(&dir, Format::Html, Some(&pattern), &config)
        .await
        .unwrap();

    assert_eq!(result.total(), 2);
    assert_eq!(result.converted(), 2);
    assert!(!tmp.path().join("out").join("skip.html").exists());
}

#[tokio::test]
async fn batch_ignores_subdirectories() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let dir = tmp.path().join("in");
    std::fs::create_dir_all(dir.join("nested")).unwrap();
    write_file(&dir, "top.md", b"# T\n");
    write_file(&dir.join("nested"), "deep.md", b"# D\n");

    let result = batch_convert(&dir, Format::Html, None, &config)
        .await
        .unwrap();

    assert_eq!(result.total(), 1);
    assert!(tmp.path().join("out").join("top.html").exists());
    assert!(!tmp.path().join("out").join("deep.html").exists());
}

#[tokio::test]
async fn batch_on_missing_directory_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let err = batch_convert(&tmp.path().join("absent"), Format::Html, None, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::FileNotFound { .. }), "got: {err}");
}

#[tokio::test]
async fn batch_empty_directory_yields_empty_result() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let dir = tmp.path().join("in");
    std::fs::create_dir(&dir).unwrap();

    let result = batch_convert(&dir, Format::Html, None, &config)
        .await
        .unwrap();
    assert_eq!(result.total(), 0);
    assert!(result.report(Format::Html).starts_with("Converted 0/0 files"));
}
