use crate::inventory::Package;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// The report envelope rendered by the formatters: the scanned source,
/// a unique scan id, a timestamp and the resolved packages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub scan_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub packages: Vec<Package>,
}

impl ScanReport {
    pub fn new(source: &str, packages: Vec<Package>) -> Self {
        Self {
            scan_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            source: source.to_string(),
            packages,
        }
    }
}

/// ReportFormatter port for rendering a scan report.
pub trait ReportFormatter {
    fn format(&self, report: &ScanReport) -> crate::shared::Result<String>;
}
