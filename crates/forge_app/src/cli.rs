use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use forge_core::{OutputFormat, StatusFilter};
use forge_logging::LogDestination;
use log::LevelFilter;

#[derive(Parser, Clone, Debug, PartialEq)]
#[command(author, version, about = "Batch image optimizer driver")]
pub struct Cli {
    /// Image files or directories to queue.
    pub inputs: Vec<PathBuf>,

    #[arg(short = 'r', long, help = "Descend into sub-directories")]
    pub recursive: bool,

    #[arg(long = "max-depth", help = "Depth limit for recursive scans")]
    pub max_depth: Option<usize>,

    #[arg(short = 'o', long, help = "Directory for optimized files")]
    pub output: Option<PathBuf>,

    #[arg(short = 'f', long, value_enum, help = "Output format")]
    pub format: Option<FormatArg>,

    #[arg(short = 'q', long, help = "Quality of the active encoder (0-100)")]
    pub quality: Option<u8>,

    #[arg(long, help = "Resize by percentage")]
    pub scale: Option<f32>,

    #[arg(long, value_enum, help = "Only process items shown by this filter")]
    pub filter: Option<FilterArg>,

    #[arg(
        short = 'p',
        long,
        help = "Processing program; gets the input path as last argument and the config as JSON on stdin",
        default_value = "pixel-forge-worker"
    )]
    pub processor: PathBuf,

    #[arg(
        long = "processor-arg",
        allow_hyphen_values = true,
        help = "Extra argument passed before the input path"
    )]
    pub processor_args: Vec<String>,

    #[arg(long = "timeout", help = "Per-item timeout in seconds", default_value = "300")]
    pub timeout_secs: u64,

    #[arg(long = "state-dir", help = "Directory holding the saved session")]
    pub state_dir: Option<PathBuf>,

    #[arg(long, help = "Ignore any saved session")]
    pub fresh: bool,

    #[arg(long = "stop-on-error", help = "Stop the batch after the first failed item")]
    pub stop_on_error: bool,

    #[arg(long, help = "Open the output folder when the batch is done")]
    pub reveal: bool,

    #[arg(long, value_enum, default_value = "terminal", help = "Where diagnostics go")]
    pub log_to: LogTarget,

    #[arg(short = 'v', long, action = clap::ArgAction::Count, help = "More diagnostics")]
    pub verbose: u8,
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        let file = PathBuf::from(forge_logging::DEFAULT_LOG_FILE);
        match self.log_to {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File(file),
            LogTarget::Both => LogDestination::Both(file),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Png,
    Jpeg,
    Webp,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Webp => OutputFormat::WebP,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterArg {
    All,
    Pending,
    Processing,
    Completed,
    Error,
}

impl From<FilterArg> for StatusFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => StatusFilter::All,
            FilterArg::Pending => StatusFilter::Pending,
            FilterArg::Processing => StatusFilter::Processing,
            FilterArg::Completed => StatusFilter::Completed,
            FilterArg::Error => StatusFilter::Error,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typical_invocation() {
        let cli = Cli::try_parse_from([
            "pixel-forge",
            "-r",
            "--max-depth",
            "3",
            "-f",
            "webp",
            "-q",
            "70",
            "--processor-arg",
            "--fast",
            "photos",
        ])
        .unwrap();

        assert_eq!(cli.inputs, vec![PathBuf::from("photos")]);
        assert!(cli.recursive);
        assert_eq!(cli.max_depth, Some(3));
        assert_eq!(cli.format.map(OutputFormat::from), Some(OutputFormat::WebP));
        assert_eq!(cli.quality, Some(70));
        assert_eq!(cli.processor_args, vec!["--fast".to_string()]);
        assert_eq!(cli.log_level(), LevelFilter::Info);
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["pixel-forge"]).unwrap();
        assert!(cli.inputs.is_empty());
        assert_eq!(cli.processor, PathBuf::from("pixel-forge-worker"));
        assert_eq!(cli.timeout_secs, 300);
        assert_eq!(cli.log_to, LogTarget::Terminal);
        assert!(matches!(cli.log_destination(), LogDestination::Terminal));
    }
}
