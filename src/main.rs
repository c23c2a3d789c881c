use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tracing::info;

use chrome_history::{
    aggregate,
    cli::FetchOptions,
    config,
    extract::Extractor,
    filter::HistoryFilter,
    logging,
    parsers::browser::VisitRecord,
};

const SUMMARY_TOP: usize = 10;

fn main() -> Result<()> {
    let opts = FetchOptions::parse();
    logging::init_logging(opts.log_format);

    // Validate the filter before the database is touched.
    let filter = HistoryFilter::from_args(
        opts.entries,
        opts.today,
        opts.start_date.as_deref(),
        opts.end_date.as_deref(),
        Local::now().date_naive(),
    )?;

    let loaded = config::load_config(opts.config_path.as_deref())?;
    let mut cfg = loaded.extractor;
    if let Some(path) = opts.path {
        cfg.database_path = Some(path);
    }
    if opts.no_save {
        cfg.save_csv = false;
    }

    let extractor = Extractor::new(cfg);
    info!(
        "fetching history limit={:?} start={:?} end={:?}",
        filter.max_entries(),
        filter.start_date(),
        filter.end_date()
    );
    let records = extractor.fetch(&filter)?;

    print_summary(&records);

    if let Some(path) = extractor.save(&records, opts.output.as_deref())? {
        println!("\nSaved {} entries to {}", records.len(), path.display());
    }
    Ok(())
}

fn print_summary(records: &[VisitRecord]) {
    println!("Fetched {} history entries", records.len());
    if records.is_empty() {
        return;
    }

    println!("\nMost visited pages (top {SUMMARY_TOP}):");
    for stat in aggregate::rank_urls(records, SUMMARY_TOP) {
        println!("{:>6}  {}", stat.visit_count, stat.url);
    }

    let domains = aggregate::rank_domains(records, SUMMARY_TOP);
    println!("\nMost visited domains (top {SUMMARY_TOP}):");
    for stat in &domains.top {
        println!("{:>6}  {}", stat.visit_count, stat.domain);
    }
    if domains.others > 0 {
        println!("{:>6}  (others)", domains.others);
    }
}
