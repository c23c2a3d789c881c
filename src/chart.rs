use std::io::Write;
use std::path::PathBuf;

use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::aggregate::{DailyStat, DomainRanking, HourlyStat};
use crate::config::VisualizerConfig;
use crate::error::HistoryError;
use crate::util;

pub const DOMAIN_CHART: &str = "domain_breakdown.svg";
pub const DAILY_CHART: &str = "daily_activity.svg";
pub const HOURLY_CHART: &str = "time_distribution.svg";

const MAX_LABEL_CHARS: usize = 24;

type DrawResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

struct BarChart {
    title: String,
    x_desc: &'static str,
    labels: Vec<String>,
    values: Vec<u64>,
}

/// A chart drawn in memory, not yet written to disk.
#[derive(Debug)]
pub struct RenderedChart {
    pub file_name: &'static str,
    pub svg: String,
}

/// Draws rankings as SVG bar charts. Nothing touches the output directory
/// until [`ChartRenderer::write_all`].
pub struct ChartRenderer {
    output_dir: PathBuf,
    size: (u32, u32),
}

impl ChartRenderer {
    pub fn new(config: &VisualizerConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            size: (config.chart_width, config.chart_height),
        }
    }

    pub fn render_domains(
        &self,
        ranking: &DomainRanking,
    ) -> Result<RenderedChart, HistoryError> {
        let mut labels: Vec<String> =
            ranking.top.iter().map(|s| short_label(&s.domain)).collect();
        let mut values: Vec<u64> = ranking.top.iter().map(|s| s.visit_count).collect();
        if ranking.others > 0 {
            labels.push("others".to_string());
            values.push(ranking.others);
        }
        self.render(
            DOMAIN_CHART,
            &BarChart {
                title: format!("Top {} domains by visits", ranking.top.len()),
                x_desc: "domain",
                labels,
                values,
            },
        )
    }

    pub fn render_daily(&self, stats: &[DailyStat]) -> Result<RenderedChart, HistoryError> {
        self.render(
            DAILY_CHART,
            &BarChart {
                title: format!("Daily activity, last {} days", stats.len()),
                x_desc: "date",
                labels: stats
                    .iter()
                    .map(|s| s.date.format("%m-%d").to_string())
                    .collect(),
                values: stats.iter().map(|s| s.visit_count).collect(),
            },
        )
    }

    pub fn render_hourly(&self, stats: &[HourlyStat]) -> Result<RenderedChart, HistoryError> {
        self.render(
            HOURLY_CHART,
            &BarChart {
                title: "Visits by hour of day".to_string(),
                x_desc: "hour",
                labels: stats.iter().map(|s| s.hour.to_string()).collect(),
                values: stats.iter().map(|s| s.visit_count).collect(),
            },
        )
    }

    fn render(
        &self,
        file_name: &'static str,
        chart: &BarChart,
    ) -> Result<RenderedChart, HistoryError> {
        let mut svg = String::new();
        draw_bar_chart(&mut svg, self.size, chart).map_err(|err| HistoryError::Render {
            path: self.output_dir.join(file_name),
            reason: err.to_string(),
        })?;
        debug!("rendered {} bars for {file_name}", chart.values.len());
        Ok(RenderedChart { file_name, svg })
    }

    /// Write every chart or none. Each chart is staged in a temporary file
    /// next to its target; targets are replaced only once all are staged, and
    /// already-replaced targets are removed if a later one fails.
    pub fn write_all(&self, charts: &[RenderedChart]) -> Result<Vec<PathBuf>, HistoryError> {
        util::ensure_output_dir(&self.output_dir)?;

        let mut staged = Vec::with_capacity(charts.len());
        for chart in charts {
            let target = self.output_dir.join(chart.file_name);
            if target.is_dir() {
                return Err(HistoryError::Render {
                    path: target,
                    reason: "target is a directory".to_string(),
                });
            }
            let mut temp = NamedTempFile::new_in(&self.output_dir)?;
            temp.write_all(chart.svg.as_bytes())?;
            temp.flush()?;
            staged.push((temp, target));
        }

        let mut written: Vec<PathBuf> = Vec::with_capacity(staged.len());
        for (temp, target) in staged {
            if let Err(err) = temp.persist(&target) {
                remove_written(&written);
                return Err(HistoryError::Render {
                    path: target,
                    reason: err.error.to_string(),
                });
            }
            written.push(target);
        }
        Ok(written)
    }
}

fn remove_written(paths: &[PathBuf]) {
    for path in paths {
        if let Err(err) = std::fs::remove_file(path) {
            warn!("could not remove {}: {err}", path.display());
        }
    }
}

fn short_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        return label.to_string();
    }
    let mut out: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
    out.push('…');
    out
}

fn draw_bar_chart(out: &mut String, size: (u32, u32), chart: &BarChart) -> DrawResult {
    let root = SVGBackend::with_string(out, size).into_drawing_area();
    root.fill(&WHITE)?;

    let bars = (chart.values.len() as u32).max(1);
    let max = chart.values.iter().copied().max().unwrap_or(0).max(1);
    let y_top = max + max / 10 + 1;

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..bars).into_segmented(), 0u64..y_top)?;

    let labels = &chart.labels;
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|value| match value {
            SegmentValue::Exact(idx) | SegmentValue::CenterOf(idx) => {
                labels.get(*idx as usize).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .x_desc(chart.x_desc)
        .y_desc("visits")
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    ctx.draw_series(
        Histogram::vertical(&ctx)
            .style(BLUE.mix(0.7).filled())
            .margin(4)
            .data(
                chart
                    .values
                    .iter()
                    .enumerate()
                    .map(|(idx, value)| (idx as u32, *value)),
            ),
    )?;

    root.present()?;
    Ok(())
}
