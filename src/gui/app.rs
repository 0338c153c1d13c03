//! GreenLens Main Application
//! Main window with control panel and chart viewer.

use crate::analysis::{Analysis, AnalysisSettings};
use crate::charts::StaticChartRenderer;
use crate::config::AppConfig;
use crate::data::{SupplierDataset, SupplierLoader};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, ViewContext};
use crate::report::{ReportBundle, ReportContents, ReportManifest};
use crate::scoring::ScoringModel;
use anyhow::Context;
use egui::SidePanel;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use tracing::{error, info, warn};

/// Where to read suppliers from.
#[derive(Debug, Clone)]
enum DataSource {
    Sample,
    File(PathBuf),
}

/// CSV loading result from background thread
enum LoadResult {
    Progress(f32, String),
    /// Data set plus the model it was scored with.
    Complete(SupplierDataset, ScoringModel),
    Error { source: DataSource, message: String },
}

/// Main application window.
pub struct SupplierApp {
    config: AppConfig,
    loader: SupplierLoader,
    dataset: SupplierDataset,
    analysis: Analysis,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
    /// Shown ahead of the next successful load message.
    load_notice: Option<String>,
}

impl SupplierApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut app = Self::with_config(config);
        let source = match &app.config.data_path {
            Some(path) => DataSource::File(path.clone()),
            None => DataSource::Sample,
        };
        app.start_loading(source);
        app
    }

    fn with_config(config: AppConfig) -> Self {
        let settings = AnalysisSettings {
            buyer_weights: config.buyer_weights,
            ..Default::default()
        };

        Self {
            loader: SupplierLoader::new(config.max_upload_bytes()),
            dataset: SupplierDataset::default(),
            analysis: Analysis::default(),
            control_panel: ControlPanel::new(settings, config.scoring_model),
            chart_viewer: ChartViewer::new(config.default_top_n),
            load_rx: None,
            is_loading: false,
            load_notice: None,
            config,
        }
    }

    /// Load suppliers in a background thread. The current data set stays
    /// in place until the new one arrives.
    fn start_loading(&mut self, source: DataSource) {
        if self.is_loading {
            return; // Already loading
        }

        self.control_panel.set_progress(5.0, "Loading suppliers...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let loader = self.loader;
        let model = self.control_panel.scoring_model;

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(20.0, "Reading CSV file...".to_string()));

            let result = match &source {
                DataSource::Sample => loader.load_default(),
                DataSource::File(path) => loader.load_csv(path),
            };

            match result {
                Ok(mut dataset) => {
                    let _ = tx.send(LoadResult::Progress(
                        60.0,
                        "Scoring suppliers...".to_string(),
                    ));
                    dataset.score(&model);
                    let _ = tx.send(LoadResult::Complete(dataset, model));
                }
                Err(e) => {
                    error!(source = ?source, error = %e, "Supplier load failed");
                    let _ = tx.send(LoadResult::Error {
                        source,
                        message: e.to_string(),
                    });
                }
            }
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    LoadResult::Complete(mut dataset, scored_with) => {
                        // The model may have been switched while loading.
                        let model = self.control_panel.scoring_model;
                        if scored_with != model {
                            dataset.score(&model);
                        }

                        let status = match self.load_notice.take() {
                            Some(notice) => format!("{} {}", notice, dataset.describe()),
                            None => dataset.describe(),
                        };
                        self.control_panel.update_dataset(&dataset);
                        self.control_panel.set_progress(100.0, &status);
                        self.dataset = dataset;
                        self.recompute();
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error { source, message } => {
                        self.is_loading = false;
                        should_keep_receiver = false;

                        match source {
                            DataSource::File(path) if self.dataset.is_empty() => {
                                warn!(path = %path.display(), "Falling back to sample suppliers");
                                self.load_notice = Some(format!(
                                    "Error loading {}: {}. Using default dataset.",
                                    path.display(),
                                    message
                                ));
                                self.start_loading(DataSource::Sample);
                            }
                            _ => {
                                self.load_notice = None;
                                self.control_panel
                                    .set_progress(0.0, &format!("Error: {}", message));
                            }
                        }
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_loading(DataSource::File(path));
        }
    }

    fn rescore(&mut self, model: ScoringModel) {
        self.dataset.score(&model);
        info!(model = model.label(), "Suppliers rescored");
        self.recompute();
    }

    fn recompute(&mut self) {
        self.analysis = Analysis::compute(&self.dataset, &self.control_panel.settings);
        self.chart_viewer
            .analysis_changed(&self.dataset, &self.analysis);
    }

    fn write_report(&self, path: &Path) -> anyhow::Result<ReportManifest> {
        let export = &self.config.export;
        let bundle = ReportBundle::new(StaticChartRenderer::new(
            export.chart_width,
            export.chart_height,
        ));
        let industries = self.dataset.industries();
        let contents = ReportContents {
            source: &self.dataset.source,
            scoring_model: self.control_panel.scoring_model.label(),
            settings: &self.control_panel.settings,
            analysis: &self.analysis,
            industries: &industries,
        };

        bundle
            .write(path, &contents)
            .with_context(|| format!("Exporting report to {}", path.display()))
    }

    /// Handle report export
    fn handle_export_report(&mut self) {
        let Some(output_path) = rfd::FileDialog::new()
            .add_filter("ZIP archive", &["zip"])
            .set_file_name("greenlens_report.zip")
            .save_file()
        else {
            return; // User cancelled
        };

        self.control_panel.set_progress(50.0, "Writing report...");

        match self.write_report(&output_path) {
            Ok(manifest) => {
                self.control_panel.set_progress(
                    100.0,
                    &format!(
                        "Report exported: {} suppliers, {} charts",
                        manifest.rows,
                        manifest.charts.len()
                    ),
                );

                if self.config.export.open_after_export {
                    if let Some(dir) = output_path.parent() {
                        if let Err(e) = open::that(dir) {
                            warn!(error = %e, "Could not open export folder");
                        }
                    }
                }
            }
            Err(e) => {
                error!(error = ?e, "Report export failed");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {:#}", e));
            }
        }
    }
}

impl eframe::App for SupplierApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(360.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::LoadSample => self.start_loading(DataSource::Sample),
                        ControlPanelAction::ScoringModelChanged => {
                            self.rescore(self.control_panel.scoring_model)
                        }
                        ControlPanelAction::SettingsChanged => self.recompute(),
                        ControlPanelAction::ExportReport => self.handle_export_report(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            let industries = self.control_panel.industries.clone();
            let view = ViewContext {
                dataset: &self.dataset,
                analysis: &self.analysis,
                settings: &self.control_panel.settings,
                industries: &industries,
            };
            self.chart_viewer.show(ui, &view);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::SustainabilityWeights;
    use std::time::Duration;

    fn wait_for_load(app: &mut SupplierApp) {
        for _ in 0..1000 {
            app.check_load_results();
            if !app.is_loading {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("supplier load did not finish");
    }

    #[test]
    fn test_failed_startup_file_falls_back_to_sample() {
        let mut app = SupplierApp::with_config(AppConfig::default());
        app.start_loading(DataSource::File(PathBuf::from("/nonexistent/suppliers.csv")));
        wait_for_load(&mut app);

        assert_eq!(app.dataset.len(), 50);
        assert!(app.control_panel.status.contains("Using default dataset."));
        assert!(app.control_panel.status.contains("Loaded 50 suppliers"));
        assert!(!app.analysis.is_empty());
    }

    #[test]
    fn test_failed_reload_keeps_current_dataset() {
        let mut app = SupplierApp::with_config(AppConfig::default());
        app.start_loading(DataSource::Sample);
        wait_for_load(&mut app);
        let loaded = app.dataset.len();

        app.start_loading(DataSource::File(PathBuf::from("/nonexistent/suppliers.csv")));
        wait_for_load(&mut app);

        assert_eq!(app.dataset.len(), loaded);
        assert!(app.control_panel.status.starts_with("Error:"));
        assert!(app.load_notice.is_none());
    }

    #[test]
    fn test_model_switched_during_load_is_applied() {
        let mut app = SupplierApp::with_config(AppConfig::default());
        app.start_loading(DataSource::Sample);

        let weighted = ScoringModel::Weighted {
            weights: SustainabilityWeights::default(),
        };
        app.control_panel.scoring_model = weighted;
        wait_for_load(&mut app);

        for supplier in &app.dataset.suppliers {
            assert_eq!(supplier.sustainability_score, weighted.score(supplier));
        }
    }
}
