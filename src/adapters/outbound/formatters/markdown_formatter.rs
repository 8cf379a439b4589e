use super::report::{ReportFormatter, ScanReport};
use crate::shared::Result;

/// Markdown table header for package information
const TABLE_HEADER: &str = "| Package | Version | Direct | Scopes |\n";

/// Markdown table separator line
const TABLE_SEPARATOR: &str = "|---------|---------|--------|--------|\n";

/// MarkdownFormatter renders the scan report as a human-readable
/// Markdown document with one table row per package.
#[derive(Debug, Default)]
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table
    /// rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, report: &ScanReport) -> Result<String> {
        let mut output = String::new();
        output.push_str(&format!("# Dependency inventory for {}\n\n", report.source));
        output.push_str(&format!(
            "Generated at {} (scan {})\n\n",
            report.generated_at.to_rfc3339(),
            report.scan_id
        ));

        let direct = report
            .packages
            .iter()
            .filter(|p| {
                p.metadata
                    .as_ref()
                    .map(|m| !m.is_transitive)
                    .unwrap_or(false)
            })
            .count();
        output.push_str(&format!(
            "{} package(s): {} direct, {} transitive\n\n",
            report.packages.len(),
            direct,
            report.packages.len() - direct
        ));

        output.push_str(TABLE_HEADER);
        output.push_str(TABLE_SEPARATOR);
        for package in &report.packages {
            let (is_direct, scopes) = match &package.metadata {
                Some(metadata) => (!metadata.is_transitive, metadata.dep_group_vals.join(", ")),
                None => (false, String::new()),
            };
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                Self::escape_markdown_table_cell(&package.name),
                Self::escape_markdown_table_cell(&package.version),
                if is_direct { "yes" } else { "no" },
                Self::escape_markdown_table_cell(&scopes),
            ));
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{MavenMetadata, Package, PURL_TYPE_MAVEN};

    fn package(name: &str, version: &str, transitive: bool) -> Package {
        Package {
            name: name.to_string(),
            version: version.to_string(),
            purl_type: PURL_TYPE_MAVEN.to_string(),
            locations: vec!["pom.xml".to_string()],
            metadata: Some(MavenMetadata {
                is_transitive: transitive,
                ..Default::default()
            }),
            plugins: vec![],
        }
    }

    #[test]
    fn test_format_counts_direct_and_transitive() {
        let report = ScanReport::new(
            "pom.xml",
            vec![
                package("org.direct:alice", "1.0.0", false),
                package("org.transitive:chuck", "1.1.1", true),
            ],
        );
        let output = MarkdownFormatter::new().format(&report).unwrap();
        assert!(output.contains("2 package(s): 1 direct, 1 transitive"));
        assert!(output.contains("| org.direct:alice | 1.0.0 | yes |"));
        assert!(output.contains("| org.transitive:chuck | 1.1.1 | no |"));
    }

    #[test]
    fn test_format_escapes_table_cells() {
        let report = ScanReport::new("pom.xml", vec![package("org|pipe:lib", "1.0", false)]);
        let output = MarkdownFormatter::new().format(&report).unwrap();
        assert!(output.contains("org\\|pipe:lib"));
    }
}
