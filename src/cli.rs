use std::path::PathBuf;

use clap::Parser;

use crate::aggregate::MAX_DAILY_DAYS;
use crate::logging::LogFormat;

/// Export Chrome browsing history to CSV.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct FetchOptions {
    /// Maximum number of entries, most recent first (default: all)
    #[arg(short = 'n', long)]
    pub entries: Option<usize>,

    /// Custom path to the Chrome `History` database
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Output CSV file (default: timestamped file in the output directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not write a CSV file
    #[arg(long)]
    pub no_save: bool,

    /// Only visits from today
    #[arg(long, conflicts_with_all = ["start_date", "end_date"])]
    pub today: bool,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Optional path to config file (YAML)
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Chart domain and daily activity from a history CSV.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct VisualizeOptions {
    /// History CSV produced by the fetcher
    pub input: PathBuf,

    /// Directory for chart images
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Number of top domains to show
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Number of trailing days in the daily chart
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=MAX_DAILY_DAYS as i64))]
    pub days: Option<u32>,

    /// Optional path to config file (YAML)
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::{FetchOptions, VisualizeOptions};
    use clap::Parser;

    #[test]
    fn fetch_defaults_to_whole_history() {
        let opts = FetchOptions::try_parse_from(["chrome-history-fetch"]).expect("parse");
        assert!(opts.entries.is_none());
        assert!(!opts.no_save);
        assert!(!opts.today);
        assert!(opts.start_date.is_none());
    }

    #[test]
    fn parses_fetch_flags() {
        let opts = FetchOptions::try_parse_from([
            "chrome-history-fetch",
            "-n",
            "50",
            "--path",
            "/tmp/History",
            "--no-save",
            "--start-date",
            "2024-01-01",
            "--end-date",
            "2024-01-31",
        ])
        .expect("parse");
        assert_eq!(opts.entries, Some(50));
        assert!(opts.no_save);
        assert_eq!(opts.start_date.as_deref(), Some("2024-01-01"));
        assert_eq!(opts.end_date.as_deref(), Some("2024-01-31"));
    }

    #[test]
    fn today_conflicts_with_explicit_dates() {
        let result = FetchOptions::try_parse_from([
            "chrome-history-fetch",
            "--today",
            "--start-date",
            "2024-01-01",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_visualize_flags() {
        let opts = VisualizeOptions::try_parse_from([
            "chrome-history-visualize",
            "history.csv",
            "-o",
            "out",
            "-n",
            "5",
            "-d",
            "7",
        ])
        .expect("parse");
        assert_eq!(opts.input.to_str(), Some("history.csv"));
        assert_eq!(opts.top_n, Some(5));
        assert_eq!(opts.days, Some(7));
    }

    #[test]
    fn days_outside_window_are_rejected() {
        for days in ["0", "4000000000"] {
            let result =
                VisualizeOptions::try_parse_from(["chrome-history-visualize", "h.csv", "-d", days]);
            assert!(result.is_err(), "{days}");
        }
    }

    #[test]
    fn visualize_requires_input() {
        assert!(VisualizeOptions::try_parse_from(["chrome-history-visualize"]).is_err());
    }
}
