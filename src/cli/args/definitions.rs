use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, ColorChoice, Parser};

use super::options::OutputFormat;
use super::styles::{cli_styles, long_version};

/// Command-line arguments accepted by the `typeahead` binary.
#[derive(Parser, Debug)]
#[command(
    name = "typeahead",
    version,
    long_version = long_version(),
    about = "Replay a keystroke script against a catalog through the search coordinator",
    color = ColorChoice::Auto,
    styles = cli_styles()
)]
pub(crate) struct CliArgs {
    #[arg(
        short,
        long = "config",
        value_name = "FILE",
        env = "TYPEAHEAD_CONFIG",
        action = ArgAction::Append,
        help = "Additional configuration file to merge (default: none)"
    )]
    pub(crate) config: Vec<PathBuf>,
    #[arg(
        short = 'n',
        long = "no-config",
        help = "Skip loading default configuration files (default: disabled)"
    )]
    pub(crate) no_config: bool,
    #[arg(
        short = 'C',
        long,
        value_name = "FILE",
        help = "JSON catalog used as the data source (default: source.catalog)"
    )]
    pub(crate) catalog: Option<PathBuf>,
    #[arg(
        short = 's',
        long,
        value_name = "FILE",
        help = "Keystroke script to replay, `-` for stdin (default: stdin)"
    )]
    pub(crate) script: Option<PathBuf>,
    #[arg(
        short = 'o',
        long,
        value_enum,
        default_value_t = OutputFormat::Plain,
        help = "Output format for the final search state"
    )]
    pub(crate) output: OutputFormat,
    #[arg(
        long = "print-config",
        help = "Print the effective configuration before running (default: disabled)"
    )]
    pub(crate) print_config: bool,
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help = "Increase log verbosity; RUST_LOG takes precedence"
    )]
    pub(crate) verbose: u8,
    #[arg(
        long = "quiet-ms",
        value_name = "MS",
        help = "Debounce quiet interval in milliseconds (default: 300)"
    )]
    pub(crate) quiet_ms: Option<u64>,
    #[arg(
        long = "suggest-min-chars",
        value_name = "N",
        help = "Minimum query length for suggestions (default: 2)"
    )]
    pub(crate) suggest_min_chars: Option<usize>,
    #[arg(
        long = "results-min-chars",
        value_name = "N",
        help = "Minimum query length for full results (default: 3)"
    )]
    pub(crate) results_min_chars: Option<usize>,
    #[arg(
        long = "suggest-before-results",
        value_parser = BoolishValueParser::new(),
        help = "Fetch suggestions before results for long queries (default: enabled)"
    )]
    pub(crate) suggest_before_results: Option<bool>,
    #[arg(
        short = 'l',
        long,
        value_name = "LANG",
        help = "Language passed to the data source (default: en)"
    )]
    pub(crate) lang: Option<String>,
    #[arg(
        long = "sort",
        value_name = "KEY",
        help = "Sort key for results: relevance, title or distance (default: relevance)"
    )]
    pub(crate) sort_key: Option<String>,
    #[arg(
        short = 'f',
        long = "filter",
        value_name = "KEY=VALUE",
        value_delimiter = ',',
        action = ArgAction::Append,
        help = "Attribute filter applied to results, repeatable (default: none)"
    )]
    pub(crate) filters: Option<Vec<String>>,
    #[arg(
        long,
        value_name = "DEG",
        allow_negative_numbers = true,
        help = "Latitude of the searcher, used with --longitude (default: none)"
    )]
    pub(crate) latitude: Option<f64>,
    #[arg(
        long,
        value_name = "DEG",
        allow_negative_numbers = true,
        help = "Longitude of the searcher, used with --latitude (default: none)"
    )]
    pub(crate) longitude: Option<f64>,
    #[arg(
        long = "suggest-latency-ms",
        value_name = "MS",
        help = "Simulated catalog latency for suggestions (default: 0)"
    )]
    pub(crate) suggest_latency_ms: Option<u64>,
    #[arg(
        long = "results-latency-ms",
        value_name = "MS",
        help = "Simulated catalog latency for results (default: 0)"
    )]
    pub(crate) results_latency_ms: Option<u64>,
    #[arg(
        long = "max-suggestions",
        value_name = "N",
        help = "Maximum suggestions returned by the catalog (default: 8)"
    )]
    pub(crate) max_suggestions: Option<usize>,
    #[arg(
        long = "simulate-failure",
        value_name = "MESSAGE",
        help = "Make every catalog lookup fail with MESSAGE (default: disabled)"
    )]
    pub(crate) simulate_failure: Option<String>,
}
