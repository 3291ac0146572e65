use std::path::PathBuf;

use clap::Parser;

use crate::reader::ManifestKind;

#[derive(Parser, Debug)]
#[command(
    name = "clearance-checkr",
    about = "Check the license clearance status of a project's dependencies",
    version
)]
pub struct Cli {
    /// Manifest files to read; `-` reads a flat list from stdin
    #[arg(default_value = "-")]
    pub files: Vec<String>,

    /// Manifest format, overriding detection from the file name
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<FormatArg>,

    /// File of exclusion patterns, one per line (`*` matches anything)
    #[arg(long, value_name = "FILE")]
    pub exclude: Option<PathBuf>,

    /// Write a CSV summary of every dependency (`-` for stdout)
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Config file [default: ./.clearance-checkr/config.toml, fallback ~/.config/clearance-checkr/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Maximum ids per clearance request
    #[arg(long, value_name = "N")]
    pub batch: Option<usize>,

    /// Maximum clearance requests in flight
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Overall lookup timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Show all dependencies and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum FormatArg {
    Flat,
    PackageLock,
    YarnLock,
    GoSum,
    MavenList,
    Pom,
}

impl From<&FormatArg> for ManifestKind {
    fn from(arg: &FormatArg) -> Self {
        match arg {
            FormatArg::Flat => ManifestKind::Flat,
            FormatArg::PackageLock => ManifestKind::PackageLock,
            FormatArg::YarnLock => ManifestKind::YarnLock,
            FormatArg::GoSum => ManifestKind::GoSum,
            FormatArg::MavenList => ManifestKind::MavenList,
            FormatArg::Pom => ManifestKind::Pom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["clearance-checkr"]);
        assert_eq!(cli.files, vec!["-".to_string()]);
        assert!(cli.format.is_none());
        assert!(matches!(cli.report, ReportFormat::Terminal));
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "clearance-checkr",
            "yarn.lock",
            "go.sum",
            "--format",
            "maven-list",
            "--batch",
            "100",
            "--timeout",
            "60",
            "-q",
        ]);
        assert_eq!(cli.files, vec!["yarn.lock", "go.sum"]);
        assert_eq!(cli.format.as_ref().map(ManifestKind::from), Some(ManifestKind::MavenList));
        assert_eq!(cli.batch, Some(100));
        assert_eq!(cli.timeout, Some(60));
        assert!(cli.quiet);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["clearance-checkr", "-v", "-q"]).is_err());
    }
}
