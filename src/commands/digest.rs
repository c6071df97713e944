use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::{CommandError, CommandResult};
use crate::ai::{NarrativeService, SupportedLanguage};
use crate::digest::{export_digest, render_pdf_async};
use crate::session::HealthSession;

pub fn insights(
    session: &HealthSession,
    service: &dyn NarrativeService,
    language: SupportedLanguage,
    out: &mut impl Write,
) -> CommandResult {
    let text = session.generate_insights(service, language)?;
    writeln!(out, "{text}")?;
    Ok(())
}

/// Where `digest` writes the PDF.
pub enum DigestTarget<'a> {
    /// Exports directory under the data directory.
    Exports(&'a Path),
    File(&'a Path),
}

/// Generates insights, lays out the digest and writes the PDF. Rendering
/// runs on a blocking task of a throwaway runtime.
pub fn digest(
    session: &HealthSession,
    service: &dyn NarrativeService,
    language: SupportedLanguage,
    generated_on: NaiveDate,
    target: DigestTarget<'_>,
    out: &mut impl Write,
) -> Result<PathBuf, CommandError> {
    let narrative = session.generate_insights(service, language)?;
    let document = session.compose_digest(&narrative, generated_on);
    let pages = document.page_count();

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let bytes = runtime.block_on(render_pdf_async(document))?;

    let path = match target {
        DigestTarget::Exports(data_dir) => export_digest(&bytes, data_dir, generated_on)?,
        DigestTarget::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &bytes)?;
            path.to_path_buf()
        }
    };

    tracing::info!(pages, path = %path.display(), "Digest written");
    writeln!(out, "Digest written to {} ({pages} pages).", path.display())?;
    Ok(path)
}
