//! Report Bundle Module
//! Writes the current analysis to a ZIP archive: the ranked table as CSV,
//! a JSON summary and the static charts as SVG.

use crate::analysis::{Analysis, AnalysisSettings};
use crate::charts::{RenderError, ScatterGroup, StaticChartRenderer};
use crate::stats::{DashboardSummary, GroupStats};
use polars::prelude::{Column, CsvWriter, DataFrame, PolarsError, SerWriter};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};
use zip::write::FileOptions;
use zip::ZipWriter;

pub const RANKED_CSV: &str = "suppliers_ranked.csv";
pub const SUMMARY_JSON: &str = "summary.json";

/// Rows included in the top-suppliers chart and summary.
const TOP_SUPPLIERS: usize = 10;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to write summary: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// What goes into a report.
pub struct ReportContents<'a> {
    pub source: &'a str,
    pub scoring_model: &'a str,
    pub settings: &'a AnalysisSettings,
    pub analysis: &'a Analysis,
    pub industries: &'a [String],
}

#[derive(Serialize)]
struct CertificationMean {
    certification: &'static str,
    mean_score: f64,
}

#[derive(Serialize)]
struct TopSupplier<'a> {
    rank: usize,
    supplier_id: &'a str,
    name: &'a str,
    weighted_score: f64,
    sustainability_score: f64,
}

#[derive(Serialize)]
struct ReportSummary<'a> {
    source: &'a str,
    scoring_model: &'a str,
    ranked_by: &'a str,
    settings: &'a AnalysisSettings,
    summary: Option<DashboardSummary>,
    by_industry: &'a [GroupStats],
    by_location: &'a [GroupStats],
    certification_means: Vec<CertificationMean>,
    top_suppliers: Vec<TopSupplier<'a>>,
}

/// Entries written by a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportManifest {
    pub rows: usize,
    pub charts: Vec<String>,
}

pub struct ReportBundle {
    renderer: StaticChartRenderer,
}

impl ReportBundle {
    pub fn new(renderer: StaticChartRenderer) -> Self {
        Self { renderer }
    }

    pub fn write(&self, path: &Path, contents: &ReportContents) -> Result<ReportManifest, ReportError> {
        let file = File::create(path)?;
        let mut zip = ZipWriter::new(file);
        let options = FileOptions::default();

        let csv = Self::ranked_csv(contents.analysis)?;
        zip.start_file(RANKED_CSV, options)?;
        zip.write_all(&csv)?;

        zip.start_file(SUMMARY_JSON, options)?;
        zip.write_all(&serde_json::to_vec_pretty(&Self::summary(contents))?)?;

        let mut charts = Vec::new();
        for (name, chart) in self.charts(contents) {
            match chart {
                Ok(svg) => {
                    let entry = format!("charts/{}.svg", name);
                    zip.start_file(entry.as_str(), options)?;
                    zip.write_all(svg.as_bytes())?;
                    charts.push(entry);
                }
                Err(RenderError::NoData(what)) => {
                    warn!(chart = name, "Skipping chart with no data: {}", what);
                }
                Err(e) => return Err(e.into()),
            }
        }

        zip.finish()?;

        let manifest = ReportManifest {
            rows: contents.analysis.ranked.len(),
            charts,
        };
        info!(
            path = %path.display(),
            rows = manifest.rows,
            charts = manifest.charts.len(),
            "Report exported"
        );
        Ok(manifest)
    }

    /// Ranked selection as CSV bytes, one row per supplier.
    fn ranked_csv(analysis: &Analysis) -> Result<Vec<u8>, ReportError> {
        let rows = &analysis.ranked;
        let float = |f: fn(&crate::data::Supplier) -> f64| -> Vec<f64> {
            rows.iter().map(|r| f(&r.supplier)).collect()
        };
        let text = |f: fn(&crate::data::Supplier) -> String| -> Vec<String> {
            rows.iter().map(|r| f(&r.supplier)).collect()
        };

        let mut df = DataFrame::new(vec![
            Column::new("rank".into(), (1..=rows.len() as u32).collect::<Vec<u32>>()),
            Column::new("supplier_id".into(), text(|s| s.supplier_id.clone())),
            Column::new("name".into(), text(|s| s.name.clone())),
            Column::new("industry".into(), text(|s| s.industry.clone())),
            Column::new("location".into(), text(|s| s.location.clone())),
            Column::new(
                "weighted_score".into(),
                rows.iter().map(|r| r.weighted_score).collect::<Vec<f64>>(),
            ),
            Column::new("sustainability_score".into(), float(|s| s.sustainability_score)),
            Column::new("carbon_footprint".into(), float(|s| s.carbon_footprint)),
            Column::new("recycling_rate".into(), float(|s| s.recycling_rate)),
            Column::new("energy_efficiency".into(), float(|s| s.energy_efficiency)),
            Column::new("water_usage".into(), float(|s| s.water_usage)),
            Column::new("waste_production".into(), float(|s| s.waste_production)),
            Column::new("lead_time_days".into(), float(|s| s.lead_time_days)),
            Column::new("onboarding_cost_usd".into(), float(|s| s.onboarding_cost_usd)),
            Column::new("switching_cost_usd".into(), float(|s| s.switching_cost_usd)),
            Column::new(
                "certifications".into(),
                text(|s| {
                    s.certifications
                        .iter()
                        .map(|c| c.label())
                        .collect::<Vec<_>>()
                        .join("; ")
                }),
            ),
        ])?;

        let mut buf = Vec::new();
        CsvWriter::new(&mut buf).include_header(true).finish(&mut df)?;
        Ok(buf)
    }

    fn summary<'a>(contents: &ReportContents<'a>) -> ReportSummary<'a> {
        let analysis = contents.analysis;
        ReportSummary {
            source: contents.source,
            scoring_model: contents.scoring_model,
            ranked_by: contents.settings.criterion.label(),
            settings: contents.settings,
            summary: analysis.summary,
            by_industry: &analysis.by_industry,
            by_location: &analysis.by_location,
            certification_means: analysis
                .certification_means
                .iter()
                .map(|(c, mean)| CertificationMean {
                    certification: c.label(),
                    mean_score: *mean,
                })
                .collect(),
            top_suppliers: analysis
                .top(TOP_SUPPLIERS)
                .iter()
                .enumerate()
                .map(|(i, r)| TopSupplier {
                    rank: i + 1,
                    supplier_id: &r.supplier.supplier_id,
                    name: &r.supplier.name,
                    weighted_score: r.weighted_score,
                    sustainability_score: r.supplier.sustainability_score,
                })
                .collect(),
        }
    }

    fn charts(&self, contents: &ReportContents) -> Vec<(&'static str, Result<String, RenderError>)> {
        let analysis = contents.analysis;
        let group_bars = |groups: &[GroupStats]| -> Vec<(String, f64)> {
            groups.iter().map(|g| (g.group_name.clone(), g.mean)).collect()
        };

        let top: Vec<(String, f64)> = analysis
            .top(TOP_SUPPLIERS)
            .iter()
            .map(|r| (r.supplier.name.clone(), r.supplier.sustainability_score))
            .collect();

        let scatter: Vec<ScatterGroup> = contents
            .industries
            .iter()
            .map(|industry| ScatterGroup {
                name: industry.clone(),
                points: analysis
                    .suppliers()
                    .filter(|s| &s.industry == industry)
                    .map(|s| (s.carbon_footprint, s.energy_efficiency))
                    .collect(),
            })
            .filter(|g| !g.points.is_empty())
            .collect();

        vec![
            (
                "score_distribution",
                self.renderer.render_histogram(
                    "Distribution of Sustainability Scores",
                    "Sustainability Score",
                    &analysis.histogram,
                ),
            ),
            (
                "top_suppliers",
                self.renderer
                    .render_bar_chart("Top Suppliers", "Sustainability Score", &top),
            ),
            (
                "industry_averages",
                self.renderer.render_bar_chart(
                    "Average Sustainability Score by Industry",
                    "Average Score",
                    &group_bars(&analysis.by_industry),
                ),
            ),
            (
                "location_averages",
                self.renderer.render_bar_chart(
                    "Average Sustainability Score by Location",
                    "Average Score",
                    &group_bars(&analysis.by_location),
                ),
            ),
            (
                "carbon_vs_energy",
                self.renderer.render_scatter(
                    "Carbon Footprint vs Energy Efficiency",
                    ("Carbon Footprint", "Energy Efficiency (%)"),
                    &scatter,
                ),
            ),
        ]
    }
}
