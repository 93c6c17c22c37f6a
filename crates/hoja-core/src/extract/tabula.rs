use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::error::HojaError;
use crate::extract::{TableBackend, TableOptions};
use crate::model::Table;

/// Table-extraction backend shelling out to tabula-java.
///
/// Runs `java -jar tabula.jar --format JSON` and parses the emitted
/// table list. Requires a Java runtime; failures at the process
/// boundary surface as errors and the orchestrator degrades to the
/// pure backend.
pub struct TabulaBackend {
    jar: PathBuf,
}

impl TabulaBackend {
    pub fn new(jar: PathBuf) -> TabulaBackend {
        TabulaBackend { jar }
    }

    /// Check if a Java runtime is available on the system.
    /// `java -version` prints to stderr, so a quiet success is not required.
    pub fn java_available() -> bool {
        Command::new("java")
            .arg("-version")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }

    /// Locate the tabula jar: `$TABULA_JAR` first, then `tabula.jar` in
    /// the working directory.
    pub fn locate_jar() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("TABULA_JAR") {
            let path = PathBuf::from(path);
            if path.is_file() {
                return Some(path);
            }
        }
        let local = PathBuf::from("tabula.jar");
        local.is_file().then_some(local)
    }
}

impl TableBackend for TabulaBackend {
    fn extract_tables(
        &self,
        pdf: &Path,
        pages: &[usize],
        opts: &TableOptions,
    ) -> Result<Vec<Table>, HojaError> {
        if pages.is_empty() {
            return Ok(Vec::new());
        }

        let mut cmd = Command::new("java");
        cmd.arg("-jar")
            .arg(&self.jar)
            .arg("--pages")
            .arg(pages_arg(pages))
            .arg("--format")
            .arg("JSON");
        if opts.lattice {
            cmd.arg("--lattice");
        }
        if opts.stream {
            cmd.arg("--stream");
        }
        if !opts.lattice && !opts.stream {
            cmd.arg("--guess");
        }
        cmd.arg(pdf);

        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HojaError::JavaNotFound
            } else {
                HojaError::Extraction(format!("tabula invocation failed: {e}"))
            }
        })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(HojaError::TabulaFailed { code, stderr });
        }

        parse_tabula_json(&output.stdout)
    }

    fn backend_name(&self) -> &str {
        "tabula"
    }
}

/// tabula-java takes 1-based page numbers as a comma list.
fn pages_arg(pages: &[usize]) -> String {
    pages
        .iter()
        .map(|p| (p + 1).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Deserialize)]
struct RawTable {
    data: Vec<Vec<RawCell>>,
}

#[derive(Deserialize)]
struct RawCell {
    text: String,
}

/// Parse tabula's JSON output into tables, first row of each as header.
fn parse_tabula_json(bytes: &[u8]) -> Result<Vec<Table>, HojaError> {
    let raw: Vec<RawTable> = serde_json::from_slice(bytes)
        .map_err(|e| HojaError::TabulaOutput(e.to_string()))?;
    Ok(raw
        .into_iter()
        .map(|t| {
            let grid: Vec<Vec<String>> = t
                .data
                .into_iter()
                .map(|row| row.into_iter().map(|c| c.text).collect())
                .collect();
            Table::from_grid(&grid)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    #[test]
    fn test_pages_arg_is_one_based() {
        assert_eq!(pages_arg(&[0, 2, 4]), "1,3,5");
    }

    #[test]
    fn test_parse_tabula_json() {
        let json = r#"[
          {
            "extraction_method": "lattice",
            "top": 10.0, "left": 10.0, "width": 100.0, "height": 40.0,
            "data": [
              [{"top":0,"left":0,"width":0,"height":0,"text":"Fecha"},
               {"top":0,"left":0,"width":0,"height":0,"text":"Importe"}],
              [{"top":0,"left":0,"width":0,"height":0,"text":"01/02/2024"},
               {"top":0,"left":0,"width":0,"height":0,"text":"1,200.00"}]
            ]
          }
        ]"#;
        let tables = parse_tabula_json(json.as_bytes()).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].columns[0].name, "Fecha");
        assert_eq!(tables[0].row_count(), 1);
        assert_eq!(
            tables[0].columns[1].cells[0],
            CellValue::Text("1,200.00".into())
        );
    }

    #[test]
    fn test_parse_tabula_json_empty_list() {
        assert!(parse_tabula_json(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_tabula_json_garbage() {
        assert!(matches!(
            parse_tabula_json(b"Exception in thread \"main\""),
            Err(HojaError::TabulaOutput(_))
        ));
    }
}
