use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "modlicense",
    about = "List a Go module's dependencies with their repositories and licenses",
    version
)]
pub struct Cli {
    /// Project directory containing go.mod
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Report format
    #[arg(short, long, default_value = "table", value_name = "FORMAT")]
    pub format: ReportFormat,

    /// Where to write the report
    #[arg(short, long, default_value = "stdout", value_name = "TARGET")]
    pub output: OutputTarget,

    /// Report file for `--output file` [default: dependencies.<txt|json|csv>]
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Include indirect dependencies
    #[arg(short, long)]
    pub indirect: bool,

    /// Star every GitHub dependency (requires a GitHub API key)
    #[arg(short, long)]
    pub thanks: bool,

    /// Write license texts to <PATH>/licenses
    #[arg(short, long)]
    pub write_licenses: bool,

    /// Config file [default: ./.modlicense/config.toml, fallback ~/.config/modlicense/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only warnings and the report; no progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Log filter implied by `--verbose` / `--quiet`, if any.
    pub fn log_filter(&self) -> Option<&'static str> {
        match (self.verbose, self.quiet) {
            (true, _) => Some("debug"),
            (_, true) => Some("warn"),
            _ => None,
        }
    }

    pub fn report_path(&self) -> PathBuf {
        self.out.clone().unwrap_or_else(|| {
            PathBuf::from(match self.format {
                ReportFormat::Table => "dependencies.txt",
                ReportFormat::Json => "dependencies.json",
                ReportFormat::Csv => "dependencies.csv",
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum ReportFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum OutputTarget {
    Stdout,
    File,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["modlicense"]).unwrap();
        assert_eq!(cli.format, ReportFormat::Table);
        assert_eq!(cli.output, OutputTarget::Stdout);
        assert!(!cli.indirect);
        assert_eq!(cli.report_path(), PathBuf::from("dependencies.txt"));
        assert_eq!(cli.log_filter(), None);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "modlicense", "-i", "-t", "-f", "csv", "-o", "file", "-q", "./proj",
        ])
        .unwrap();
        assert!(cli.indirect);
        assert!(cli.thanks);
        assert_eq!(cli.format, ReportFormat::Csv);
        assert_eq!(cli.output, OutputTarget::File);
        assert_eq!(cli.report_path(), PathBuf::from("dependencies.csv"));
        assert_eq!(cli.log_filter(), Some("warn"));
        assert_eq!(cli.path, PathBuf::from("./proj"));
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        assert!(Cli::try_parse_from(["modlicense", "--format", "xml"]).is_err());
        assert!(Cli::try_parse_from(["modlicense", "--output", "s3"]).is_err());
    }
}
