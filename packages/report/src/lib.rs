//! PDF report rendering for announcement summaries.
//!
//! Renders a record sequence into a paginated A4 document using the PDF
//! base-14 fonts, so no font assets ship with the binary. Layout is a
//! simple top-down flow with word wrapping and page breaks; anything
//! fancier is out of scope here.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use async_trait::async_trait;
use chrono::Local;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use tracing::info;

use announcements::error::RenderError;
use announcements::traits::ReportRenderer;
use announcements::types::ResultRecord;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 18.0;
const LINE_HEIGHT_MM: f32 = 5.2;
const BODY_SIZE: f32 = 9.5;
const HEADING_SIZE: f32 = 12.0;
const TITLE_SIZE: f32 = 18.0;

/// Characters per wrapped line at the body size. Approximate by design;
/// Helvetica metrics vary per glyph and exactness buys nothing here.
const WRAP_WIDTH: usize = 100;

/// Renders records into a paginated PDF at the requested path.
pub struct PdfReportRenderer {
    title: String,
}

impl PdfReportRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for PdfReportRenderer {
    fn default() -> Self {
        Self::new("Corporate Announcements Report")
    }
}

#[async_trait]
impl ReportRenderer for PdfReportRenderer {
    async fn render(&self, records: &[ResultRecord], path: &Path) -> Result<(), RenderError> {
        render_report(&self.title, records, path)?;

        info!(
            path = %path.display(),
            records = records.len(),
            "Rendered PDF report"
        );
        Ok(())
    }
}

/// Greedy word wrap at a fixed column width.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Cursor over the document: tracks the current page layer and vertical
/// position, breaking to a fresh page when a line would cross the bottom
/// margin.
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: printpdf::PdfLayerReference,
    y: f32,
}

impl<'a> PageCursor<'a> {
    fn new(doc: &'a PdfDocumentReference, layer: printpdf::PdfLayerReference) -> Self {
        Self {
            doc,
            layer,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        }
    }

    fn ensure_room(&mut self, needed_mm: f32) {
        if self.y - needed_mm < MARGIN_MM {
            let (page, layer) =
                self.doc
                    .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    }

    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        self.ensure_room(LINE_HEIGHT_MM);
        self.y -= LINE_HEIGHT_MM;
        self.layer
            .use_text(text, size, Mm(MARGIN_MM), Mm(self.y), font);
    }

    fn wrapped(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        for line in wrap_text(text, WRAP_WIDTH) {
            self.line(&line, size, font);
        }
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }
}

fn render_report(title: &str, records: &[ResultRecord], path: &Path) -> Result<(), RenderError> {
    let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError(e.to_string()))?;

    let mut cursor = PageCursor::new(&doc, doc.get_page(page).get_layer(layer));

    cursor.line(title, TITLE_SIZE, &bold);
    cursor.gap(2.0);
    cursor.line(
        &format!("Generated on {}", Local::now().format("%Y-%m-%d %H:%M")),
        BODY_SIZE,
        &regular,
    );
    cursor.line(
        &format!("Announcements in this report: {}", records.len()),
        BODY_SIZE,
        &regular,
    );
    cursor.gap(6.0);

    for (i, record) in records.iter().enumerate() {
        cursor.ensure_room(LINE_HEIGHT_MM * 5.0);
        cursor.line(
            &format!("{}. {}", i + 1, record.company),
            HEADING_SIZE,
            &bold,
        );
        cursor.wrapped(&format!("Company: {}", record.company_url), BODY_SIZE, &regular);
        cursor.wrapped(&format!("Document: {}", record.pdf_url), BODY_SIZE, &regular);
        cursor.line(
            &format!(
                "Extracted text: {} characters | Model: {}",
                record.text_length, record.model_used
            ),
            BODY_SIZE,
            &regular,
        );
        cursor.gap(1.5);
        cursor.wrapped(&record.summary, BODY_SIZE, &regular);
        cursor.gap(6.0);
    }

    // The cursor holds a layer reference into the document; release it
    // before save() unwraps the document.
    drop(cursor);

    let file = File::create(path)
        .map_err(|e| RenderError(format!("creating {}: {e}", path.display())))?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| RenderError(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(company: &str) -> ResultRecord {
        ResultRecord {
            company: company.to_string(),
            company_url: format!("https://example.com/company/{company}/"),
            pdf_url: format!("https://example.com/{company}.pdf"),
            summary: "Document Type: Quarterly Results. ".repeat(40),
            text_length: 9_000,
            model_used: "gpt-3.5-turbo".to_string(),
        }
    }

    #[test]
    fn test_wrap_text_respects_width() {
        let lines = wrap_text(&"word ".repeat(200), 40);
        assert!(lines.iter().all(|l| l.chars().count() <= 40));
        assert!(!lines.is_empty());
    }

    #[test]
    fn test_wrap_text_empty() {
        assert!(wrap_text("   ", 40).is_empty());
    }

    #[tokio::test]
    async fn test_render_writes_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");

        let renderer = PdfReportRenderer::default();
        renderer
            .render(&[record("TCS"), record("LT")], &path)
            .await
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_render_paginates_long_reports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.pdf");

        let records: Vec<ResultRecord> = (0..40).map(|i| record(&format!("CO{i}"))).collect();
        PdfReportRenderer::default()
            .render(&records, &path)
            .await
            .unwrap();

        assert!(path.exists());
    }
}
