use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, TimeZone};
use tracing::{info, warn};

use crate::aggregate::{self, DomainRanking};
use crate::chart::ChartRenderer;
use crate::config::VisualizerConfig;
use crate::error::HistoryError;
use crate::metadata::csv::load_records;
use crate::parsers::browser::VisitRecord;

#[derive(Debug)]
pub struct VisualizeReport {
    pub records: usize,
    pub domains: DomainRanking,
    pub charts: Vec<PathBuf>,
}

pub struct Visualizer {
    config: VisualizerConfig,
}

impl Visualizer {
    pub fn new(config: VisualizerConfig) -> Self {
        Self { config }
    }

    /// Load `input` and render its charts, grouping by local date and hour.
    /// An input without records yields [`HistoryError::EmptyResultSet`] and
    /// leaves the output directory untouched.
    pub fn run(&self, input: &Path) -> Result<VisualizeReport, HistoryError> {
        let records = load_records(input)?;
        info!("loaded {} visits from {}", records.len(), input.display());
        self.render(&records, Local::now().date_naive(), &Local)
    }

    /// Draw every chart in memory, then write them together. A failure at
    /// any step leaves no chart files behind.
    pub fn render<Tz: TimeZone>(
        &self,
        records: &[VisitRecord],
        today: NaiveDate,
        tz: &Tz,
    ) -> Result<VisualizeReport, HistoryError> {
        if records.is_empty() {
            return Err(HistoryError::EmptyResultSet);
        }

        let renderer = ChartRenderer::new(&self.config);
        let mut rendered = Vec::new();

        let hourly = aggregate::hourly_distribution(records, tz);
        rendered.push(renderer.render_hourly(&hourly)?);

        let domains = aggregate::rank_domains(records, self.config.top_n);
        if domains.skipped > 0 {
            warn!("{} visits had no parseable host", domains.skipped);
        }
        rendered.push(renderer.render_domains(&domains)?);

        let daily = aggregate::daily_activity(records, self.config.days, today, tz);
        if daily.iter().all(|stat| stat.visit_count == 0) {
            warn!(
                "no visits in the last {} days, skipping daily chart",
                daily.len()
            );
        } else {
            rendered.push(renderer.render_daily(&daily)?);
        }

        let charts = renderer.write_all(&rendered)?;
        info!("wrote {} charts", charts.len());

        Ok(VisualizeReport {
            records: records.len(),
            domains,
            charts,
        })
    }
}
