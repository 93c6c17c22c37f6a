use crate::extract::PdfSource;
use crate::model::{CellValue, Column, Table};

pub const PAGE_COLUMN: &str = "Pagina";
pub const LINE_COLUMN: &str = "Linea";
pub const TEXT_COLUMN: &str = "Texto";

/// How extracted text is laid out into rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextLayout {
    /// One row per line, tagged with page and line number.
    Line,
    /// One row per page with its full text.
    Page,
}

#[derive(Debug, Clone)]
pub struct TextOptions {
    pub layout: TextLayout,
    /// Skip blank lines (line layout only).
    pub skip_blank: bool,
    /// Split the text field into positional `Col_N` columns.
    pub separator: Option<String>,
}

impl Default for TextOptions {
    fn default() -> Self {
        TextOptions {
            layout: TextLayout::Line,
            skip_blank: false,
            separator: None,
        }
    }
}

/// Extract text records from the selected pages into a table with
/// `Pagina`/`Linea`/`Texto` columns. Pages that fail to extract count as
/// empty text. The result can have zero rows; the caller decides what an
/// empty outcome means.
pub fn extract_text(source: &dyn PdfSource, pages: &[usize], opts: &TextOptions) -> Table {
    // (page, line, text); line numbers only in line layout
    let mut records: Vec<(f64, Option<f64>, String)> = Vec::new();

    for &index in pages {
        let text = source.page_text(index);
        let page = (index + 1) as f64;
        match opts.layout {
            TextLayout::Page => records.push((page, None, text)),
            TextLayout::Line => {
                for (n, line) in text.split('\n').enumerate() {
                    if opts.skip_blank && line.trim().is_empty() {
                        continue;
                    }
                    records.push((page, Some((n + 1) as f64), line.to_string()));
                }
            }
        }
    }

    if records.is_empty() {
        return Table::default();
    }

    let mut columns = vec![Column {
        name: PAGE_COLUMN.into(),
        cells: records.iter().map(|r| CellValue::Number(r.0)).collect(),
    }];
    if opts.layout == TextLayout::Line {
        columns.push(Column {
            name: LINE_COLUMN.into(),
            cells: records
                .iter()
                .map(|r| CellValue::Number(r.1.unwrap_or_default()))
                .collect(),
        });
    }

    match &opts.separator {
        Some(sep) => {
            // literal "\t" on the command line means a tab
            let sep = sep.replace("\\t", "\t");
            let split: Vec<Vec<&str>> = records
                .iter()
                .map(|r| r.2.split(sep.as_str()).collect())
                .collect();
            let width = split.iter().map(|parts| parts.len()).max().unwrap_or(0);
            for i in 0..width {
                columns.push(Column {
                    name: format!("Col_{}", i + 1),
                    cells: split
                        .iter()
                        .map(|parts| {
                            parts.get(i).map(|s| CellValue::from_raw(s)).unwrap_or(CellValue::Empty)
                        })
                        .collect(),
                });
            }
        }
        None => columns.push(Column {
            name: TEXT_COLUMN.into(),
            cells: records
                .iter()
                .map(|r| CellValue::from_raw(&r.2))
                .collect(),
        }),
    }

    Table { columns }
}
