use super::report::{ReportFormatter, ScanReport};
use crate::shared::Result;
use anyhow::Context;

/// JsonFormatter renders the scan report as pretty-printed JSON.
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &ScanReport) -> Result<String> {
        serde_json::to_string_pretty(report).context("failed to serialize scan report")
    }
}
