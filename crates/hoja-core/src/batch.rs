use std::path::{Path, PathBuf};

use log::warn;

use crate::convert::Outcome;
use crate::error::HojaError;

/// Result of a batch run over a directory of PDFs.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Files that produced an output workbook.
    pub converted: usize,
    /// Files where neither tables nor text were found.
    pub nothing: usize,
    /// File names that errored. The batch continues past them.
    pub failures: Vec<String>,
}

/// Collect the PDF files of a directory, sorted by name.
pub fn find_pdfs(dir: &Path) -> Result<Vec<PathBuf>, HojaError> {
    let mut pdfs: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                    .unwrap_or(false)
        })
        .collect();
    pdfs.sort();
    Ok(pdfs)
}

/// Convert every file through `convert_one`, catching per-file errors so
/// one bad PDF never aborts the rest of the batch.
pub fn run_batch<F>(pdfs: &[PathBuf], out_dir: &Path, mut convert_one: F) -> BatchSummary
where
    F: FnMut(&Path, &Path) -> Result<Outcome, HojaError>,
{
    let mut summary = BatchSummary::default();
    for pdf in pdfs {
        let stem = pdf.file_stem().unwrap_or_default().to_string_lossy();
        let out = out_dir.join(format!("{stem}.xlsx"));
        match convert_one(pdf, &out) {
            Ok(Outcome::Nothing) => summary.nothing += 1,
            Ok(_) => summary.converted += 1,
            Err(e) => {
                let name = pdf
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                warn!("failed on '{name}': {e}");
                summary.failures.push(name);
            }
        }
    }
    summary
}
