//! PDF rendering via `printpdf`.
//!
//! Rendering is a single whole-document operation: layout is complete
//! before the first byte is written and the result is the full buffer.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use printpdf::*;
use thiserror::Error;

use super::layout::{Element, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use super::DigestDocument;
use crate::config;

#[derive(Error, Debug)]
pub enum DigestError {
    #[error("PDF font error: {0}")]
    Font(String),

    #[error("PDF save error: {0}")]
    Save(String),

    #[error("PDF render task failed: {0}")]
    Task(String),

    #[error("Cannot write digest: {0}")]
    Io(#[from] std::io::Error),
}

/// Download filename embedding the generation date.
pub fn digest_filename(date: NaiveDate) -> String {
    format!("Arogya_Health_Digest_{}.pdf", date.format("%Y-%m-%d"))
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

/// Layout y runs down from the top edge; PDF y runs up from the bottom.
fn flip(y_mm: f32) -> Mm {
    Mm(PAGE_HEIGHT_MM - y_mm)
}

/// Renders a laid-out digest to PDF bytes.
pub fn render_pdf(digest: &DigestDocument) -> Result<Vec<u8>, DigestError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        &digest.title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| DigestError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| DigestError::Font(e.to_string()))?;

    for (i, page) in digest.pages.iter().enumerate() {
        let (page_idx, layer_idx) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
        };
        let layer = doc.get_page(page_idx).get_layer(layer_idx);
        layer.set_outline_color(rgb((200, 200, 200)));
        layer.set_outline_thickness(0.5);

        for element in &page.elements {
            match element {
                Element::Text { text, x, y, style, .. } => {
                    let face = if style.is_bold() { &bold } else { &font };
                    layer.set_fill_color(rgb(style.rgb()));
                    layer.use_text(text.as_str(), style.font_size(), Mm(*x), flip(*y), face);
                }
                Element::Rule { x1, y1, x2, y2 } => {
                    layer.add_line(Line {
                        points: vec![
                            (Point::new(Mm(*x1), flip(*y1)), false),
                            (Point::new(Mm(*x2), flip(*y2)), false),
                        ],
                        is_closed: false,
                    });
                }
            }
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| DigestError::Save(e.to_string()))?;
    buf.into_inner()
        .map_err(|e| DigestError::Save(format!("PDF buffer error: {e}")))
}

/// Renders on the blocking pool so async callers are never stalled.
pub async fn render_pdf_async(digest: DigestDocument) -> Result<Vec<u8>, DigestError> {
    tokio::task::spawn_blocking(move || render_pdf(&digest))
        .await
        .map_err(|e| DigestError::Task(e.to_string()))?
}

/// Saves PDF bytes to the exports directory under `data_dir`.
pub fn export_digest(
    pdf_bytes: &[u8],
    data_dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf, DigestError> {
    let exports_dir = config::exports_dir(data_dir);
    std::fs::create_dir_all(&exports_dir)?;

    let path = exports_dir.join(digest_filename(date));
    std::fs::write(&path, pdf_bytes)?;
    tracing::info!(path = %path.display(), bytes = pdf_bytes.len(), "Digest exported");
    Ok(path)
}
