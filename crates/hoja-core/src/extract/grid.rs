use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::HojaError;
use crate::extract::source::LopdfSource;
use crate::extract::{PdfSource, TableBackend, TableOptions};
use crate::model::Table;

/// Pure table-extraction backend with no external runtime.
///
/// Reconstructs grids from extracted page text: columns are runs of
/// text separated by two or more spaces, and consecutive lines sharing
/// the same column count form a table, first line as header. Lattice
/// and stream flags are accepted but have no effect here; this backend
/// only ever infers columns from alignment.
pub struct GridBackend;

/// Minimum rows (header included) before a run of aligned lines counts
/// as a table.
const MIN_GRID_ROWS: usize = 2;
/// Minimum columns before a line is considered tabular.
const MIN_GRID_COLS: usize = 2;

static COLUMN_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

impl GridBackend {
    pub fn new() -> GridBackend {
        GridBackend
    }
}

impl Default for GridBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBackend for GridBackend {
    fn extract_tables(
        &self,
        pdf: &Path,
        pages: &[usize],
        opts: &TableOptions,
    ) -> Result<Vec<Table>, HojaError> {
        if opts.lattice || opts.stream {
            log::debug!("grid backend ignores lattice/stream flags");
        }

        let source = LopdfSource::open(pdf)?;
        let mut tables = Vec::new();
        for &index in pages {
            let text = source.page_text(index);
            let lines: Vec<&str> = text.lines().collect();
            for grid in detect_grids(&lines) {
                tables.push(Table::from_grid(&grid));
            }
        }
        Ok(tables)
    }

    fn backend_name(&self) -> &str {
        "grid"
    }
}

/// Split a line into cells on gaps of two or more spaces.
fn split_columns(line: &str) -> Vec<String> {
    COLUMN_GAP
        .split(line.trim())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Scan lines for runs of consecutive rows sharing the same column
/// count. Each run of at least [`MIN_GRID_ROWS`] rows becomes one grid.
fn detect_grids(lines: &[&str]) -> Vec<Vec<Vec<String>>> {
    let mut grids = Vec::new();
    let mut run: Vec<Vec<String>> = Vec::new();

    for line in lines {
        let cols = split_columns(line);
        if cols.len() >= MIN_GRID_COLS {
            if run.first().map(|r| r.len()) == Some(cols.len()) || run.is_empty() {
                run.push(cols);
                continue;
            }
        }
        // column count changed, or a non-tabular line ends the run
        if run.len() >= MIN_GRID_ROWS {
            grids.push(std::mem::take(&mut run));
        } else {
            run.clear();
        }
        if cols.len() >= MIN_GRID_COLS {
            run.push(cols);
        }
    }
    if run.len() >= MIN_GRID_ROWS {
        grids.push(run);
    }
    grids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_columns() {
        assert_eq!(
            split_columns("  Fecha       Importe   Concepto "),
            vec!["Fecha", "Importe", "Concepto"]
        );
        assert_eq!(split_columns("una sola frase"), vec!["una sola frase"]);
    }

    #[test]
    fn test_detect_grids_basic() {
        let lines = vec![
            "Factura 2024-003",
            "",
            "Fecha         Importe",
            "01/02/2024    1,200.00",
            "02/02/2024    90.50",
            "",
            "Gracias por su compra",
        ];
        let grids = detect_grids(&lines);
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].len(), 3);
        assert_eq!(grids[0][0], vec!["Fecha", "Importe"]);
        assert_eq!(grids[0][2], vec!["02/02/2024", "90.50"]);
    }

    #[test]
    fn test_detect_grids_requires_two_rows() {
        let lines = vec!["solo  una", "y luego prosa normal sin columnas"];
        assert!(detect_grids(&lines).is_empty());
    }

    #[test]
    fn test_detect_grids_column_count_change_splits() {
        let lines = vec![
            "A  B",
            "1  2",
            "X  Y  Z",
            "1  2  3",
            "4  5  6",
        ];
        let grids = detect_grids(&lines);
        assert_eq!(grids.len(), 2);
        assert_eq!(grids[0].len(), 2);
        assert_eq!(grids[1].len(), 3);
    }

    #[test]
    fn test_detect_grids_prose_only() {
        let lines = vec![
            "Estimado cliente,",
            "le saludamos atentamente y adjuntamos el detalle.",
        ];
        assert!(detect_grids(&lines).is_empty());
    }
}
