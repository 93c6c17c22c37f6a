use std::path::Path;

use crate::error::HojaError;
use crate::extract::PdfSource;

/// PDF document opened with lopdf. Covers page counting and per-page
/// plain-text extraction; table reconstruction lives in the backends.
pub struct LopdfSource {
    doc: lopdf::Document,
    // 1-based page numbers in document order
    pages: Vec<u32>,
}

impl LopdfSource {
    pub fn open(path: &Path) -> Result<LopdfSource, HojaError> {
        let doc = lopdf::Document::load(path)
            .map_err(|e| HojaError::Extraction(format!("failed to load PDF: {e}")))?;
        let pages = doc.get_pages().keys().copied().collect();
        Ok(LopdfSource { doc, pages })
    }
}

impl PdfSource for LopdfSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> String {
        let Some(&page) = self.pages.get(index) else {
            return String::new();
        };
        match self.doc.extract_text(&[page]) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("text extraction failed on page {}: {e}", index + 1);
                String::new()
            }
        }
    }
}
