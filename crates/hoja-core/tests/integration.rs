//! Integration tests for the convert() pipeline.
//!
//! Uses mock table backends and an in-memory PdfSource so the tests run
//! without Java, tabula, or real PDF files; the produced workbooks are
//! read back with calamine.

use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};
use hoja_core::convert::{convert, ConvertOptions, Mode, Outcome};
use hoja_core::error::HojaError;
use hoja_core::extract::text::{TextLayout, TextOptions};
use hoja_core::extract::{PdfSource, TableBackend, TableOptions};
use hoja_core::model::Table;
use hoja_core::pages::PageSelection;

struct FakeSource {
    pages: Vec<&'static str>,
}

impl PdfSource for FakeSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> String {
        self.pages.get(index).unwrap_or(&"").to_string()
    }
}

/// Backend returning canned grids, or failing like a broken runtime.
struct MockBackend {
    grids: Vec<Vec<Vec<&'static str>>>,
    fail: bool,
}

impl MockBackend {
    fn with_tables(grids: Vec<Vec<Vec<&'static str>>>) -> MockBackend {
        MockBackend { grids, fail: false }
    }

    fn empty() -> MockBackend {
        MockBackend { grids: vec![], fail: false }
    }

    fn failing() -> MockBackend {
        MockBackend { grids: vec![], fail: true }
    }
}

impl TableBackend for MockBackend {
    fn extract_tables(
        &self,
        _pdf: &Path,
        _pages: &[usize],
        _opts: &TableOptions,
    ) -> Result<Vec<Table>, HojaError> {
        if self.fail {
            return Err(HojaError::Extraction("mock backend failure".into()));
        }
        Ok(self
            .grids
            .iter()
            .map(|g| {
                let grid: Vec<Vec<String>> = g
                    .iter()
                    .map(|row| row.iter().map(|s| s.to_string()).collect())
                    .collect();
                Table::from_grid(&grid)
            })
            .collect())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn out_path(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

fn invoice_grid() -> Vec<Vec<&'static str>> {
    vec![
        vec!["Fecha", "Importe", "Concepto"],
        vec!["01/02/2024", "1,200.00", "alquiler"],
        vec!["15/02/2024", "90.50", "luz"],
    ]
}

// ---------------------------------------------------------------------------
// Auto mode: a table on page 1 wins, the prose pages are never extracted
// ---------------------------------------------------------------------------
#[test]
fn auto_mode_prefers_tables_over_text() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "out.xlsx");
    let source = FakeSource {
        pages: vec!["(tabla)", "parrafo dos", "parrafo tres"],
    };
    let backend = MockBackend::with_tables(vec![invoice_grid()]);

    let outcome = convert(
        Path::new("factura.pdf"),
        &out,
        &source,
        &[&backend],
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Tables { tables: 1, rows: 2 });

    let mut wb: Xlsx<_> = open_workbook(&out).unwrap();
    assert_eq!(wb.sheet_names(), vec!["Tabla_1"]);
    let range = wb.worksheet_range("Tabla_1").unwrap();
    assert_eq!(range.height(), 3);
    assert_eq!(range.get_value((0, 2)), Some(&Data::String("Concepto".into())));
    // column promotion turned the date strings into real dates
    assert!(matches!(range.get_value((1, 0)), Some(Data::DateTime(_))));
}

// ---------------------------------------------------------------------------
// The strategy chain: a failing first backend degrades to the second
// ---------------------------------------------------------------------------
#[test]
fn failing_backend_falls_through_to_next() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "out.xlsx");
    let source = FakeSource { pages: vec![""] };
    let broken = MockBackend::failing();
    let working = MockBackend::with_tables(vec![invoice_grid()]);

    let outcome = convert(
        Path::new("x.pdf"),
        &out,
        &source,
        &[&broken, &working],
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Tables { tables: 1, rows: 2 });
}

// ---------------------------------------------------------------------------
// Blank tables are discarded, which can push auto mode into text fallback
// ---------------------------------------------------------------------------
#[test]
fn blank_tables_do_not_count() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "out.xlsx");
    let source = FakeSource { pages: vec!["algo de texto"] };
    let blank = MockBackend::with_tables(vec![vec![
        vec!["A", "B"],
        vec!["", ""],
        vec!["  ", ""],
    ]]);

    let outcome = convert(
        Path::new("x.pdf"),
        &out,
        &source,
        &[&blank],
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Text { rows: 1 });
}

// ---------------------------------------------------------------------------
// Tables-only mode reports Nothing instead of falling back to text
// ---------------------------------------------------------------------------
#[test]
fn tables_only_mode_has_no_text_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "out.xlsx");
    let source = FakeSource { pages: vec!["mucho texto util"] };
    let backend = MockBackend::empty();
    let opts = ConvertOptions { mode: Mode::Tables, ..Default::default() };

    let outcome = convert(Path::new("x.pdf"), &out, &source, &[&backend], &opts).unwrap();

    assert_eq!(outcome, Outcome::Nothing);
    assert!(!out.exists());
}

// ---------------------------------------------------------------------------
// Text mode, line layout, ';' separator, blank suppression
// ---------------------------------------------------------------------------
#[test]
fn text_mode_with_separator_splits_columns() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "out.xlsx");
    let source = FakeSource {
        pages: vec!["ana;100\n\nberta;200", "carla;300"],
    };
    let opts = ConvertOptions {
        mode: Mode::Text,
        text: TextOptions {
            layout: TextLayout::Line,
            skip_blank: true,
            separator: Some(";".into()),
        },
        ..Default::default()
    };

    let outcome = convert(Path::new("x.pdf"), &out, &source, &[], &opts).unwrap();
    assert_eq!(outcome, Outcome::Text { rows: 3 });

    let mut wb: Xlsx<_> = open_workbook(&out).unwrap();
    assert_eq!(wb.sheet_names(), vec!["Texto"]);
    let range = wb.worksheet_range("Texto").unwrap();
    assert_eq!(range.get_value((0, 0)), Some(&Data::String("Pagina".into())));
    assert_eq!(range.get_value((0, 1)), Some(&Data::String("Linea".into())));
    assert_eq!(range.get_value((0, 2)), Some(&Data::String("Col_1".into())));
    assert_eq!(range.get_value((0, 3)), Some(&Data::String("Col_2".into())));
    // blank line suppressed: 3 data rows only
    assert_eq!(range.height(), 4);
    assert_eq!(range.get_value((1, 2)), Some(&Data::String("ana".into())));
    // the numeric Col_2 column got promoted
    assert_eq!(range.get_value((3, 3)), Some(&Data::Float(300.0)));
}

// ---------------------------------------------------------------------------
// Page layout: one record per page, full page text
// ---------------------------------------------------------------------------
#[test]
fn text_mode_page_layout() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "out.xlsx");
    let source = FakeSource { pages: vec!["uno\ndos", "tres"] };
    let opts = ConvertOptions {
        mode: Mode::Text,
        text: TextOptions { layout: TextLayout::Page, ..Default::default() },
        ..Default::default()
    };

    let outcome = convert(Path::new("x.pdf"), &out, &source, &[], &opts).unwrap();
    assert_eq!(outcome, Outcome::Text { rows: 2 });

    let mut wb: Xlsx<_> = open_workbook(&out).unwrap();
    let range = wb.worksheet_range("Texto").unwrap();
    assert_eq!(range.get_value((1, 1)), Some(&Data::String("uno\ndos".into())));
}

// ---------------------------------------------------------------------------
// Page selection restricts both text extraction and numbering
// ---------------------------------------------------------------------------
#[test]
fn page_selection_limits_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "out.xlsx");
    let source = FakeSource { pages: vec!["p1", "p2", "p3"] };
    let opts = ConvertOptions {
        mode: Mode::Text,
        pages: PageSelection::parse("2-3").unwrap(),
        ..Default::default()
    };

    let outcome = convert(Path::new("x.pdf"), &out, &source, &[], &opts).unwrap();
    assert_eq!(outcome, Outcome::Text { rows: 2 });

    let mut wb: Xlsx<_> = open_workbook(&out).unwrap();
    let range = wb.worksheet_range("Texto").unwrap();
    // pages keep their real (1-based) numbers
    assert_eq!(range.get_value((1, 0)), Some(&Data::Float(2.0)));
    assert_eq!(range.get_value((1, 2)), Some(&Data::String("p2".into())));
}

// ---------------------------------------------------------------------------
// Single-sheet mode concatenates tables into "Datos"
// ---------------------------------------------------------------------------
#[test]
fn single_sheet_concatenates_tables() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "out.xlsx");
    let source = FakeSource { pages: vec![""] };
    let backend = MockBackend::with_tables(vec![
        invoice_grid(),
        vec![vec!["Fecha", "Importe"], vec!["01/03/2024", "10"]],
    ]);
    let opts = ConvertOptions { single_sheet: true, ..Default::default() };

    let outcome = convert(Path::new("x.pdf"), &out, &source, &[&backend], &opts).unwrap();
    assert_eq!(outcome, Outcome::Tables { tables: 2, rows: 3 });

    let mut wb: Xlsx<_> = open_workbook(&out).unwrap();
    assert_eq!(wb.sheet_names(), vec!["Datos"]);
    let range = wb.worksheet_range("Datos").unwrap();
    assert_eq!(range.height(), 4);
}

// ---------------------------------------------------------------------------
// Separate-sheets default: one sheet per table
// ---------------------------------------------------------------------------
#[test]
fn separate_sheets_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "out.xlsx");
    let source = FakeSource { pages: vec![""] };
    let backend = MockBackend::with_tables(vec![invoice_grid(), invoice_grid()]);

    convert(
        Path::new("x.pdf"),
        &out,
        &source,
        &[&backend],
        &ConvertOptions::default(),
    )
    .unwrap();

    let mut wb: Xlsx<_> = open_workbook(&out).unwrap();
    assert_eq!(wb.sheet_names(), vec!["Tabla_1", "Tabla_2"]);
}

// ---------------------------------------------------------------------------
// A document with no tables and no text is Nothing, not an error
// ---------------------------------------------------------------------------
#[test]
fn empty_document_reports_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "out.xlsx");
    let source = FakeSource { pages: vec![] };
    let backend = MockBackend::empty();

    let outcome = convert(
        Path::new("x.pdf"),
        &out,
        &source,
        &[&backend],
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Nothing);
    assert!(!out.exists());
}
