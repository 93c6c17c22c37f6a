#[derive(Debug, thiserror::Error)]
pub enum HojaError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("java not found. The tabula backend needs a Java runtime on PATH")]
    JavaNotFound,

    #[error("tabula failed with exit code {code}: {stderr}")]
    TabulaFailed { code: i32, stderr: String },

    #[error("could not read tabula output: {0}")]
    TabulaOutput(String),

    #[error("invalid page selector '{0}'")]
    InvalidPages(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
