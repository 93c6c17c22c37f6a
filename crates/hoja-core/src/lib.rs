//! PDF to spreadsheet conversion with heuristic type inference.
//!
//! The pipeline per document: resolve the page selection, try the table
//! backends in order (tabula-java, then the built-in grid extractor),
//! fall back to line or page oriented text extraction, promote string
//! columns to dates and numbers, and write a formatted xlsx workbook.

pub mod batch;
pub mod convert;
pub mod error;
pub mod excel;
pub mod extract;
pub mod infer;
pub mod model;
pub mod pages;
pub mod probe;

pub use convert::{convert, ConvertOptions, Mode, Outcome};
pub use error::HojaError;
pub use model::{CellValue, Column, Table};
pub use pages::PageSelection;
