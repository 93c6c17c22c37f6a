use std::path::Path;

use log::{debug, info, warn};

use crate::error::HojaError;
use crate::excel::{self, Sheet};
use crate::extract::text::{self, TextOptions};
use crate::extract::{PdfSource, TableBackend, TableOptions};
use crate::infer;
use crate::model::Table;
use crate::pages::PageSelection;

/// Requested extraction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Tables first, text fallback when none are found.
    Auto,
    /// Tables only; no text fallback.
    Tables,
    /// Text only.
    Text,
}

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub mode: Mode,
    pub pages: PageSelection,
    pub table: TableOptions,
    pub text: TextOptions,
    /// Concatenate all tables into one "Datos" sheet instead of one
    /// sheet per table.
    pub single_sheet: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            mode: Mode::Auto,
            pages: PageSelection::All,
            table: TableOptions::default(),
            text: TextOptions::default(),
            single_sheet: false,
        }
    }
}

/// What a conversion produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Tables { tables: usize, rows: usize },
    Text { rows: usize },
    /// No tables and no text. Informational, not an error; no output
    /// file is written.
    Nothing,
}

/// Convert one PDF into an xlsx file.
///
/// Strategy chain per document: each table backend in order, then text
/// extraction, as far as the mode allows. Backend errors are logged and
/// degrade to the next strategy instead of aborting.
pub fn convert(
    pdf: &Path,
    out: &Path,
    source: &dyn PdfSource,
    backends: &[&dyn TableBackend],
    opts: &ConvertOptions,
) -> Result<Outcome, HojaError> {
    let pages = opts.pages.resolve(source.page_count());

    if opts.mode != Mode::Text {
        let tables = collect_tables(pdf, &pages, backends, &opts.table);
        if !tables.is_empty() {
            let count = tables.len();
            let rows = tables.iter().map(Table::row_count).sum();
            let sheets = table_sheets(tables, opts.single_sheet);
            excel::write_workbook(&sheets, out)?;
            return Ok(Outcome::Tables { tables: count, rows });
        }
        if opts.mode == Mode::Tables {
            return Ok(Outcome::Nothing);
        }
        info!("no tables detected, falling back to text extraction");
    }

    let mut table = text::extract_text(source, &pages, &opts.text);
    if table.is_empty() {
        return Ok(Outcome::Nothing);
    }
    infer::promote_columns(&mut table);
    let rows = table.row_count();
    let sheet = Sheet { name: "Texto".into(), table };
    excel::write_workbook(&[sheet], out)?;
    Ok(Outcome::Text { rows })
}

/// Run the backends in order until one yields at least one non-empty
/// table. Tables that are blank once fully-empty rows and columns are
/// dropped do not count.
fn collect_tables(
    pdf: &Path,
    pages: &[usize],
    backends: &[&dyn TableBackend],
    opts: &TableOptions,
) -> Vec<Table> {
    for backend in backends {
        match backend.extract_tables(pdf, pages, opts) {
            Ok(found) => {
                let kept: Vec<Table> = found
                    .into_iter()
                    .filter_map(|mut t| {
                        t.drop_blank();
                        (!t.is_empty()).then_some(t)
                    })
                    .collect();
                if !kept.is_empty() {
                    debug!("{}: {} table(s) extracted", backend.backend_name(), kept.len());
                    return kept;
                }
                debug!("{}: no tables found", backend.backend_name());
            }
            Err(e) => warn!("{}: {e}", backend.backend_name()),
        }
    }
    Vec::new()
}

fn table_sheets(mut tables: Vec<Table>, single_sheet: bool) -> Vec<Sheet> {
    for t in &mut tables {
        infer::promote_columns(t);
    }
    if single_sheet {
        vec![Sheet {
            name: "Datos".into(),
            table: Table::concat(tables),
        }]
    } else {
        tables
            .into_iter()
            .enumerate()
            .map(|(i, table)| Sheet {
                name: format!("Tabla_{}", i + 1),
                table,
            })
            .collect()
    }
}
