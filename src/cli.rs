use clap::Parser;

use crate::adapters::outbound::formatters::{
    JsonFormatter, MarkdownFormatter, ReportFormatter,
};

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(format!(
                "Invalid format: {}. Please specify 'json' or 'markdown'",
                s
            )),
        }
    }
}

impl OutputFormat {
    /// Creates a formatter instance for the specified output format
    pub fn create_formatter(&self) -> Box<dyn ReportFormatter> {
        match self {
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new()),
        }
    }
}

/// Resolve a Maven pom.xml into a transitive dependency inventory
#[derive(Parser, Debug)]
#[command(name = "pomscan")]
#[command(version)]
#[command(about = "Resolve a Maven pom.xml into a transitive dependency inventory", long_about = None)]
pub struct Args {
    /// Path to a pom.xml or to a directory containing one (defaults to
    /// the current directory)
    #[arg()]
    pub path: Option<String>,

    /// Output format: json or markdown
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Registry URL used instead of Maven Central
    #[arg(short, long)]
    pub registry: Option<String>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
