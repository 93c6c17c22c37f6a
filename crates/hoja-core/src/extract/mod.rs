pub mod grid;
pub mod source;
pub mod tabula;
pub mod text;

use std::path::Path;

use crate::error::HojaError;
use crate::model::Table;

/// Flags forwarded to the table-extraction backends.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableOptions {
    /// Lattice mode: cells delimited by visible ruling lines.
    pub lattice: bool,
    /// Stream mode: cell boundaries inferred from text alignment.
    pub stream: bool,
}

/// A table-extraction strategy.
///
/// The orchestrator evaluates backends in order until one yields a
/// non-empty result; any error counts as "no tables" and falls through
/// to the next strategy.
pub trait TableBackend {
    /// Extract string tables from the given 0-based pages of a PDF file.
    fn extract_tables(
        &self,
        pdf: &Path,
        pages: &[usize],
        opts: &TableOptions,
    ) -> Result<Vec<Table>, HojaError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Read-only access to an open PDF document.
pub trait PdfSource {
    fn page_count(&self) -> usize;

    /// Plain text of a 0-based page. Extraction failures yield an empty
    /// string, never an error.
    fn page_text(&self, index: usize) -> String;
}
