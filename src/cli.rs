use crate::domain::{OutputFormat, ScanConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormatChoice {
    #[value(help = "Duplicate paths on stdout, diagnostics on stderr")]
    Text,
    #[value(help = "One JSON object per event on stdout")]
    Json,
}

impl From<OutputFormatChoice> for OutputFormat {
    fn from(choice: OutputFormatChoice) -> Self {
        match choice {
            OutputFormatChoice::Text => OutputFormat::Text,
            OutputFormatChoice::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "dupes")]
#[command(about = "Report files whose content is identical")]
#[command(version)]
pub struct Cli {
    #[arg(help = "Files or directories to scan")]
    pub paths: Vec<PathBuf>,

    #[arg(
        short = 'v',
        long = "verbose",
        help = "Show the original and fingerprint of each duplicate, and per-target totals"
    )]
    pub verbose: bool,

    #[arg(
        long = "no-color",
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new(),
        help = "Disable color output"
    )]
    pub no_color: bool,

    #[arg(
        short = 'f',
        long = "format",
        help = "Output format",
        value_enum,
        default_value = "text"
    )]
    pub output_format: OutputFormatChoice,

    #[arg(long = "progress", help = "Show a progress spinner on stderr")]
    pub progress: bool,

    #[arg(
        long = "strict",
        help = "Exit non-zero if any file or directory could not be read"
    )]
    pub strict: bool,

    #[arg(
        long = "mmap-threshold",
        help = "File size threshold for using memory mapping",
        default_value = "67108864"
    )]
    pub mmap_threshold: u64,
}

impl Cli {
    pub fn to_scan_config(&self) -> ScanConfig {
        ScanConfig::new()
            .with_targets(self.paths.clone())
            .with_verbose(self.verbose)
            .with_color(!self.no_color)
            .with_format(self.output_format.clone().into())
            .with_progress(self.progress)
            .with_strict(self.strict)
            .with_mmap_threshold(self.mmap_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["dupes", "/a", "/b"]).unwrap();
        let config = cli.to_scan_config();
        assert_eq!(config.targets, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert!(!config.verbose);
        assert!(!config.strict);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.mmap_threshold, 64 * 1024 * 1024);
    }

    #[test]
    fn test_no_targets_is_allowed() {
        let cli = Cli::try_parse_from(["dupes"]).unwrap();
        assert!(cli.to_scan_config().targets.is_empty());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "dupes", "-v", "--no-color", "--strict", "--format", "json", "/d",
        ])
        .unwrap();
        let config = cli.to_scan_config();
        assert!(config.verbose);
        assert!(!config.color);
        assert!(config.strict);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_version_short_circuits() {
        let err = Cli::try_parse_from(["dupes", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
