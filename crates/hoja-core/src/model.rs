use chrono::NaiveDate;

/// A single spreadsheet cell value.
///
/// Values originate as `Text` from the extraction backends and are
/// reclassified at most once: either by the column-level pass in
/// [`crate::infer::promote_columns`] or by the per-cell coercion applied
/// while writing the workbook. Never both.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl CellValue {
    /// Classify a raw extracted string: blank becomes `Empty`, anything
    /// else stays text until inference runs.
    pub fn from_raw(s: &str) -> CellValue {
        if s.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<CellValue>,
}

/// A rectangular table: ordered named columns of equal length.
///
/// Header names need not be unique, neither within a table nor across
/// tables from the same document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    /// Build a table from a raw string grid, treating the first row as the
    /// header. Ragged rows are padded with empty cells.
    pub fn from_grid(grid: &[Vec<String>]) -> Table {
        let Some((header, data)) = grid.split_first() else {
            return Table::default();
        };
        let width = grid.iter().map(|row| row.len()).max().unwrap_or(0);
        let columns = (0..width)
            .map(|c| Column {
                name: header.get(c).map(|s| s.trim().to_string()).unwrap_or_default(),
                cells: data
                    .iter()
                    .map(|row| row.get(c).map(|s| CellValue::from_raw(s)).unwrap_or(CellValue::Empty))
                    .collect(),
            })
            .collect();
        Table { columns }
    }

    /// Number of data rows (the header is not a row).
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.cells.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Drop rows, then columns, that consist entirely of empty cells.
    pub fn drop_blank(&mut self) {
        let rows = self.row_count();
        let keep: Vec<bool> = (0..rows)
            .map(|r| self.columns.iter().any(|c| !c.cells[r].is_empty()))
            .collect();
        if keep.contains(&false) {
            for col in &mut self.columns {
                let mut r = 0;
                col.cells.retain(|_| {
                    let k = keep[r];
                    r += 1;
                    k
                });
            }
        }
        self.columns.retain(|c| !c.cells.iter().all(CellValue::is_empty));
    }

    /// Stack tables into one, aligning columns by name (first-seen order).
    /// Repeated names within a table align by their nth occurrence, so a
    /// table with two `Importe` columns contributes to two output columns.
    /// Rows from a table without a given column get empty cells.
    pub fn concat(tables: Vec<Table>) -> Table {
        let keyed: Vec<Vec<(String, usize)>> =
            tables.iter().map(Table::occurrence_keys).collect();
        let mut keys: Vec<(String, usize)> = Vec::new();
        for table_keys in &keyed {
            for key in table_keys {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }

        let mut columns: Vec<Column> = keys
            .iter()
            .map(|(name, _)| Column { name: name.clone(), cells: Vec::new() })
            .collect();
        for (t, table_keys) in tables.iter().zip(&keyed) {
            let rows = t.row_count();
            for (col, key) in columns.iter_mut().zip(&keys) {
                match table_keys.iter().position(|k| k == key) {
                    Some(i) => col.cells.extend(t.columns[i].cells.iter().cloned()),
                    None => col.cells.extend(std::iter::repeat(CellValue::Empty).take(rows)),
                }
            }
        }
        Table { columns }
    }

    /// Each column tagged with how many earlier columns share its name.
    fn occurrence_keys(&self) -> Vec<(String, usize)> {
        let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
        self.columns
            .iter()
            .map(|c| {
                let n = counts.entry(c.name.as_str()).or_insert(0);
                let key = (c.name.clone(), *n);
                *n += 1;
                key
            })
            .collect()
    }
}
