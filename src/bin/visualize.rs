use anyhow::Result;
use clap::Parser;

use chrome_history::{
    HistoryError,
    cli::VisualizeOptions,
    config,
    logging,
    visualize::Visualizer,
};

fn main() -> Result<()> {
    let opts = VisualizeOptions::parse();
    logging::init_logging(opts.log_format);

    let loaded = config::load_config(opts.config_path.as_deref())?;
    let mut cfg = loaded.visualizer;
    if let Some(dir) = opts.output_dir {
        cfg.output_dir = dir;
    }
    if let Some(top_n) = opts.top_n {
        cfg.top_n = top_n;
    }
    if let Some(days) = opts.days {
        cfg.days = days;
    }

    match Visualizer::new(cfg).run(&opts.input) {
        Ok(report) => {
            println!("Loaded {} history entries", report.records);
            for chart in &report.charts {
                println!("Saved chart {}", chart.display());
            }
            Ok(())
        }
        Err(HistoryError::EmptyResultSet) => {
            println!("No data: {} contains no history entries", opts.input.display());
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
