use std::path::PathBuf;

use serde::Serialize;

use crate::extract::tabula::TabulaBackend;

/// Availability of the optional external table-extraction runtime.
///
/// The pure collaborators are compiled in, so the probe only governs
/// the tabula backend: without it the conversion still runs on the
/// built-in extractor.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityReport {
    pub java: bool,
    pub tabula_jar: Option<PathBuf>,
}

impl CapabilityReport {
    pub fn runtime_backend_available(&self) -> bool {
        self.java && self.tabula_jar.is_some()
    }
}

/// Probe the environment once, explicitly, instead of failing somewhere
/// inside the first extraction attempt.
pub fn probe() -> CapabilityReport {
    CapabilityReport {
        java: TabulaBackend::java_available(),
        tabula_jar: TabulaBackend::locate_jar(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_backend_needs_both() {
        let report = CapabilityReport { java: true, tabula_jar: None };
        assert!(!report.runtime_backend_available());
        let report = CapabilityReport {
            java: true,
            tabula_jar: Some(PathBuf::from("tabula.jar")),
        };
        assert!(report.runtime_backend_available());
    }
}
