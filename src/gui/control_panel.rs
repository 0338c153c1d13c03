//! Control Panel Widget
//! Left side panel with data source, filters, buyer requirements and ranking.

use crate::analysis::AnalysisSettings;
use crate::data::{Certification, DatasetBounds, SupplierDataset};
use crate::scoring::{RankingCriterion, ScoringModel, SustainabilityWeights};
use crate::stats::ValueRange;
use egui::{Color32, ComboBox, RichText, ScrollArea, Slider};
use std::collections::BTreeSet;

/// Left side control panel with file selection and filter controls.
pub struct ControlPanel {
    pub settings: AnalysisSettings,
    pub scoring_model: ScoringModel,
    /// Weights used when the weighted model is picked.
    weighted_weights: SustainabilityWeights,
    pub source: String,
    pub industries: Vec<String>,
    pub locations: Vec<String>,
    pub bounds: DatasetBounds,
    pub progress: f32,
    pub status: String,
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(settings: AnalysisSettings, scoring_model: ScoringModel) -> Self {
        let weighted_weights = match scoring_model {
            ScoringModel::Weighted { weights } => weights,
            ScoringModel::Balanced => SustainabilityWeights::default(),
        };

        Self {
            settings,
            scoring_model,
            weighted_weights,
            source: String::new(),
            industries: Vec::new(),
            locations: Vec::new(),
            bounds: DatasetBounds::default(),
            progress: 0.0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }

    /// Reset filter choices for a freshly loaded data set.
    /// Buyer weights and ranking criterion are kept.
    pub fn update_dataset(&mut self, dataset: &SupplierDataset) {
        self.source = dataset.source.clone();
        self.industries = dataset.industries();
        self.locations = dataset.locations();
        self.bounds = dataset.bounds();
        self.settings = AnalysisSettings {
            criterion: self.settings.criterion,
            ..AnalysisSettings::for_dataset(dataset, self.settings.buyer_weights)
        };
        self.export_enabled = !dataset.is_empty();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;
        let mut changed = false;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌿 GreenLens")
                    .size(22.0)
                    .color(Color32::from_rgb(46, 204, 113)),
            );
            ui.label(
                RichText::new("Sustainable Supplier Selection")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let text = if self.source.is_empty() {
                        "No data loaded"
                    } else {
                        self.source.as_str()
                    };
                    ui.label(RichText::new(text).size(12.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                        if ui
                            .small_button("Sample")
                            .on_hover_text("Reload the bundled sample suppliers")
                            .clicked()
                        {
                            action = ControlPanelAction::LoadSample;
                        }
                    });
                });
            });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label("Scoring:");
            let balanced = matches!(self.scoring_model, ScoringModel::Balanced);
            if ui.radio(balanced, "Balanced").clicked() && !balanced {
                self.scoring_model = ScoringModel::Balanced;
                action = ControlPanelAction::ScoringModelChanged;
            }
            if ui.radio(!balanced, "Weighted").clicked() && balanced {
                self.scoring_model = ScoringModel::Weighted {
                    weights: self.weighted_weights,
                };
                action = ControlPanelAction::ScoringModelChanged;
            }
        });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters Section =====
        ui.label(RichText::new("🔍 Filters").size(14.0).strong());
        ui.add_space(5.0);

        changed |= Self::multi_select(
            ui,
            "industries",
            "Industry",
            &self.industries,
            &mut self.settings.filter.industries,
        );
        ui.add_space(5.0);
        changed |= Self::multi_select(
            ui,
            "locations",
            "Location",
            &self.locations,
            &mut self.settings.filter.locations,
        );
        ui.add_space(5.0);

        ui.label("Certifications (any of):");
        for cert in Certification::ALL {
            let mut held = self.settings.filter.certifications.contains(cert);
            if ui.checkbox(&mut held, cert.label()).changed() {
                self.settings.filter.certifications.set(cert, held);
                changed = true;
            }
        }

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Buyer Requirements Section =====
        ui.label(RichText::new("💰 Buyer Requirements").size(14.0).strong());
        ui.add_space(5.0);

        let weights = &mut self.settings.buyer_weights;
        for (label, value) in [
            ("Sustainability", &mut weights.sustainability),
            ("Lead Time", &mut weights.lead_time),
            ("Onboarding Cost", &mut weights.onboarding_cost),
            ("Switching Cost", &mut weights.switching_cost),
        ] {
            changed |= ui
                .add(Slider::new(value, 0.0..=100.0).suffix("%").text(label))
                .changed();
        }

        ui.add_space(5.0);
        let filter = &mut self.settings.filter;
        changed |= Self::cap_slider(ui, "Max lead time (days)", &mut filter.max_lead_time, self.bounds.lead_time);
        changed |= Self::cap_slider(
            ui,
            "Max onboarding cost ($)",
            &mut filter.max_onboarding_cost,
            self.bounds.onboarding_cost,
        );
        changed |= Self::cap_slider(
            ui,
            "Max switching cost ($)",
            &mut filter.max_switching_cost,
            self.bounds.switching_cost,
        );

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Ranking Section =====
        ui.label(RichText::new("🏆 Ranking").size(14.0).strong());
        ui.add_space(5.0);

        ComboBox::from_id_salt("ranking_criterion")
            .width(220.0)
            .selected_text(self.settings.criterion.label())
            .show_ui(ui, |ui| {
                for criterion in RankingCriterion::ALL {
                    let text = if criterion.descending() {
                        format!("{} (High to Low)", criterion.label())
                    } else {
                        format!("{} (Low to High)", criterion.label())
                    };
                    if ui
                        .selectable_value(&mut self.settings.criterion, criterion, text)
                        .changed()
                    {
                        changed = true;
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("📦 Export Report").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportReport;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.progress >= 100.0 {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        if changed && action == ControlPanelAction::None {
            action = ControlPanelAction::SettingsChanged;
        }
        action
    }

    fn multi_select(
        ui: &mut egui::Ui,
        id: &str,
        label: &str,
        options: &[String],
        selected: &mut BTreeSet<String>,
    ) -> bool {
        let mut changed = false;

        ui.horizontal(|ui| {
            ui.label(format!("{} ({}/{})", label, selected.len(), options.len()));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("Clear All").clicked() {
                    selected.clear();
                    changed = true;
                }
                if ui.small_button("Select All").clicked() {
                    selected.extend(options.iter().cloned());
                    changed = true;
                }
            });
        });

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(id)
                    .max_height(110.0)
                    .show(ui, |ui| {
                        for option in options {
                            let mut checked = selected.contains(option);
                            if ui.checkbox(&mut checked, option).changed() {
                                if checked {
                                    selected.insert(option.clone());
                                } else {
                                    selected.remove(option);
                                }
                                changed = true;
                            }
                        }
                    });
            });

        changed
    }

    /// Optional upper bound: a checkbox enables a slider over the observed range.
    fn cap_slider(
        ui: &mut egui::Ui,
        label: &str,
        cap: &mut Option<f64>,
        range: Option<ValueRange>,
    ) -> bool {
        let Some(range) = range else {
            return false;
        };
        let mut changed = false;

        ui.horizontal(|ui| {
            let mut enabled = cap.is_some();
            if ui.checkbox(&mut enabled, label).changed() {
                *cap = enabled.then_some(range.max);
                changed = true;
            }
        });

        if let Some(value) = cap.as_mut() {
            changed |= ui
                .add(Slider::new(value, range.min..=range.max).max_decimals(1))
                .changed();
        }
        changed
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    LoadSample,
    ScoringModelChanged,
    SettingsChanged,
    ExportReport,
}
