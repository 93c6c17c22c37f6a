use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};

use crate::error::HojaError;
use crate::infer::coerce;
use crate::model::{CellValue, Table};

/// Excel refuses sheet names longer than this.
pub const MAX_SHEET_NAME: usize = 31;

/// Text wider than this no longer influences its column width.
const MAX_TEXT_WIDTH: usize = 50;
/// Minimum width reserved for a column holding dates.
const DATE_WIDTH: usize = 12;
const WIDTH_PADDING: f64 = 3.0;
const MAX_COL_WIDTH: f64 = 55.0;

/// A named sheet of tabular data ready to be written.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub table: Table,
}

/// Serialize the sheets to an xlsx file, applying per-cell type coercion,
/// display formats and auto-sized column widths.
pub fn write_workbook(sheets: &[Sheet], path: &Path) -> Result<(), HojaError> {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let ws = workbook.add_worksheet();
        ws.set_name(truncate_sheet_name(&sheet.name))?;
        write_sheet(ws, &sheet.table)?;
    }
    workbook.save(path)?;
    Ok(())
}

fn write_sheet(ws: &mut Worksheet, table: &Table) -> Result<(), XlsxError> {
    let header_fmt = Format::new().set_bold().set_align(FormatAlign::Center);
    let date_fmt = Format::new()
        .set_num_format("dd/mm/yyyy")
        .set_align(FormatAlign::Center);
    let int_fmt = Format::new()
        .set_num_format("#,##0")
        .set_align(FormatAlign::Right);
    let dec_fmt = Format::new()
        .set_num_format("#,##0.00")
        .set_align(FormatAlign::Right);

    for (c, col) in table.columns.iter().enumerate() {
        let c = c as u16;
        ws.write_string_with_format(0, c, col.name.as_str(), &header_fmt)?;

        let mut width = col.name.chars().count();
        for (r, cell) in col.cells.iter().enumerate() {
            let row = (r + 1) as u32;
            // cells the column-level pass left as text get one more
            // chance to become typed values here
            let value = match cell {
                CellValue::Text(s) => coerce(s),
                other => other.clone(),
            };
            match value {
                CellValue::Empty => {}
                CellValue::Date(d) => {
                    ws.write_datetime_with_format(row, c, &d, &date_fmt)?;
                    width = width.max(DATE_WIDTH);
                }
                CellValue::Number(n) => {
                    let fmt = if n.fract() == 0.0 { &int_fmt } else { &dec_fmt };
                    ws.write_number_with_format(row, c, n, fmt)?;
                    width = width.max(grouped_repr(n).chars().count());
                }
                CellValue::Text(s) => {
                    ws.write_string(row, c, s.as_str())?;
                    width = width.max(s.chars().count().min(MAX_TEXT_WIDTH));
                }
            }
        }
        ws.set_column_width(c, (width as f64 + WIDTH_PADDING).min(MAX_COL_WIDTH))?;
    }
    Ok(())
}

fn truncate_sheet_name(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME).collect()
}

/// Thousands-grouped, two-decimal rendering of a number, used only to
/// estimate how wide its column must be.
fn grouped_repr(n: f64) -> String {
    let formatted = format!("{:.2}", n.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if n < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
