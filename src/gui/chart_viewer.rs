//! Chart Viewer Widget
//! Central tabbed area: dashboard, rankings, trends, scenario simulation,
//! supplier details and buyer analysis.

use crate::analysis::{Analysis, AnalysisSettings};
use crate::charts::{ChartPlotter, RadarSeries};
use crate::data::{Supplier, SupplierDataset};
use crate::scenario::{self, PortfolioImpact, ScenarioError};
use crate::scoring::{RankingCriterion, SubScores};
use egui::{Color32, ComboBox, Grid, RichText, ScrollArea};

const CARD_SPACING: f32 = 15.0;
const WARNING_COLOR: Color32 = Color32::from_rgb(243, 156, 18);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Rankings,
    Trends,
    Scenario,
    Details,
    Buyer,
}

impl Tab {
    const ALL: [Tab; 6] = [
        Tab::Dashboard,
        Tab::Rankings,
        Tab::Trends,
        Tab::Scenario,
        Tab::Details,
        Tab::Buyer,
    ];

    fn label(&self) -> &'static str {
        match self {
            Tab::Dashboard => "📊 Dashboard",
            Tab::Rankings => "🏆 Rankings",
            Tab::Trends => "📈 Trends",
            Tab::Scenario => "🔮 Scenario Simulation",
            Tab::Details => "📋 Supplier Details",
            Tab::Buyer => "💰 Buyer Analysis",
        }
    }
}

/// Everything a frame of the viewer reads.
pub struct ViewContext<'a> {
    pub dataset: &'a SupplierDataset,
    pub analysis: &'a Analysis,
    pub settings: &'a AnalysisSettings,
    pub industries: &'a [String],
}

/// Tabbed chart display area.
pub struct ChartViewer {
    pub tab: Tab,
    pub top_n: usize,
    current_id: Option<String>,
    alternative_id: Option<String>,
    detail_id: Option<String>,
    scenario: Option<Result<PortfolioImpact, ScenarioError>>,
}

impl ChartViewer {
    pub fn new(top_n: usize) -> Self {
        Self {
            tab: Tab::default(),
            top_n: top_n.clamp(5, 50),
            current_id: None,
            alternative_id: None,
            detail_id: None,
            scenario: None,
        }
    }

    /// Drop selections that left the filtered set and recompute the scenario.
    pub fn analysis_changed(&mut self, dataset: &SupplierDataset, analysis: &Analysis) {
        let keep = |id: &mut Option<String>| {
            if id.as_deref().is_some_and(|i| analysis.find(i).is_none()) {
                *id = None;
            }
        };
        keep(&mut self.current_id);
        keep(&mut self.detail_id);
        if self
            .alternative_id
            .as_deref()
            .is_some_and(|i| dataset.find(i).is_none())
        {
            self.alternative_id = None;
        }
        self.refresh_scenario(dataset, analysis);
    }

    fn refresh_scenario(&mut self, dataset: &SupplierDataset, analysis: &Analysis) {
        self.scenario = match (&self.current_id, &self.alternative_id) {
            (Some(current), Some(alternative)) => {
                let pool: Vec<Supplier> = analysis.suppliers().cloned().collect();
                Some(scenario::substitute(&pool, &dataset.suppliers, current, alternative))
            }
            _ => None,
        };
    }

    pub fn show(&mut self, ui: &mut egui::Ui, view: &ViewContext) {
        ui.horizontal(|ui| {
            for tab in Tab::ALL {
                ui.selectable_value(&mut self.tab, tab, RichText::new(tab.label()).size(14.0));
            }
        });
        ui.separator();

        if view.dataset.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if view.analysis.is_empty() {
                    ui.label(
                        RichText::new(
                            "No suppliers match your current filters. Please adjust your filters to see results.",
                        )
                        .color(WARNING_COLOR),
                    );
                    return;
                }

                match self.tab {
                    Tab::Dashboard => Self::show_dashboard(ui, view),
                    Tab::Rankings => self.show_rankings(ui, view),
                    Tab::Trends => Self::show_trends(ui, view),
                    Tab::Scenario => self.show_scenario(ui, view),
                    Tab::Details => self.show_details(ui, view),
                    Tab::Buyer => Self::show_buyer(ui, view),
                }
            });
    }

    fn metric_card(ui: &mut egui::Ui, title: &str, value: String) {
        egui::Frame::none()
            .rounding(8.0)
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_min_width(180.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(title).size(12.0).color(Color32::GRAY));
                    ui.label(RichText::new(value).size(22.0).strong());
                });
            });
    }

    fn heading(ui: &mut egui::Ui, text: &str) {
        ui.add_space(8.0);
        ui.label(RichText::new(text).size(18.0).strong());
        ui.add_space(6.0);
    }

    fn show_dashboard(ui: &mut egui::Ui, view: &ViewContext) {
        Self::heading(ui, "Supplier Sustainability Dashboard");

        if let Some(summary) = view.analysis.summary {
            ui.horizontal_wrapped(|ui| {
                Self::metric_card(
                    ui,
                    "Average Sustainability Score",
                    format!("{:.2}", summary.avg_sustainability_score),
                );
                Self::metric_card(
                    ui,
                    "Average Carbon Footprint",
                    format!("{:.2}", summary.avg_carbon_footprint),
                );
                Self::metric_card(
                    ui,
                    "Average Recycling Rate",
                    format!("{:.2}%", summary.avg_recycling_rate),
                );
                Self::metric_card(
                    ui,
                    "Average Energy Efficiency",
                    format!("{:.2}%", summary.avg_energy_efficiency),
                );
            });
            ui.label(
                RichText::new(format!(
                    "{} of {} suppliers selected",
                    summary.supplier_count,
                    view.dataset.len()
                ))
                .size(11.0)
                .color(Color32::GRAY),
            );
        }

        ui.add_space(CARD_SPACING);
        let suppliers: Vec<&Supplier> = view.analysis.suppliers().collect();

        ui.columns(2, |cols| {
            cols[0].label(RichText::new("Distribution of Sustainability Scores").strong());
            ChartPlotter::draw_score_histogram(&mut cols[0], &view.analysis.histogram, false);
            cols[1].label(RichText::new("Sustainability Scores by Industry").strong());
            ChartPlotter::draw_score_box_by_industry(
                &mut cols[1],
                &view.analysis.by_industry,
                &suppliers,
                false,
            );
        });

        ui.add_space(CARD_SPACING);
        ui.label(RichText::new("Carbon Footprint vs Energy Efficiency").strong());
        ChartPlotter::draw_carbon_energy_scatter(ui, &suppliers, view.industries, true);
    }

    fn show_rankings(&mut self, ui: &mut egui::Ui, view: &ViewContext) {
        Self::heading(ui, "Supplier Rankings");
        let criterion = view.settings.criterion;
        ui.label(format!("Ranked by: {}", criterion.label()));
        ui.add(egui::Slider::new(&mut self.top_n, 5..=50).text("Suppliers to display"));
        ui.add_space(8.0);

        let rows = view.analysis.top(self.top_n);

        Grid::new("rankings_table")
            .striped(true)
            .min_col_width(50.0)
            .spacing([10.0, 4.0])
            .show(ui, |ui| {
                let mut headers = vec!["#", "Name", "Industry", "Location"];
                if criterion == RankingCriterion::WeightedScore {
                    headers.push("Weighted");
                }
                headers.extend([
                    "Score",
                    "Carbon",
                    "Recycling %",
                    "Energy %",
                    "Water",
                    "Waste",
                    "Lead Time",
                    "Onboarding $",
                    "Switching $",
                    "Certifications",
                ]);
                for h in headers {
                    ui.label(RichText::new(h).strong().size(11.0));
                }
                ui.end_row();

                for (i, r) in rows.iter().enumerate() {
                    let s = &r.supplier;
                    ui.label((i + 1).to_string());
                    ui.label(&s.name);
                    ui.label(&s.industry);
                    ui.label(&s.location);
                    if criterion == RankingCriterion::WeightedScore {
                        ui.label(format!("{:.3}", r.weighted_score));
                    }
                    ui.label(format!("{:.2}", s.sustainability_score));
                    ui.label(format!("{:.2}", s.carbon_footprint));
                    ui.label(format!("{:.2}", s.recycling_rate));
                    ui.label(format!("{:.2}", s.energy_efficiency));
                    ui.label(format!("{:.2}", s.water_usage));
                    ui.label(format!("{:.2}", s.waste_production));
                    ui.label(format!("{:.1}", s.lead_time_days));
                    ui.label(format!("{:.0}", s.onboarding_cost_usd));
                    ui.label(format!("{:.0}", s.switching_cost_usd));
                    let certs: Vec<&str> = s.certifications.iter().map(|c| c.label()).collect();
                    ui.label(certs.join(", "));
                    ui.end_row();
                }
            });

        ui.add_space(CARD_SPACING);
        let title = if criterion == RankingCriterion::WeightedScore {
            format!("Top {} Suppliers by Weighted Score", rows.len())
        } else {
            format!("Top {} Suppliers by Sustainability Score", rows.len())
        };
        ui.label(RichText::new(title).strong());
        ChartPlotter::draw_ranked_bars(ui, rows, criterion, view.industries);
    }

    fn show_trends(ui: &mut egui::Ui, view: &ViewContext) {
        Self::heading(ui, "Sustainability Trends");

        ui.columns(2, |cols| {
            cols[0].label(RichText::new("Average Sustainability Score by Industry").strong());
            ChartPlotter::draw_group_bars(
                &mut cols[0],
                "industry_bars",
                &view.analysis.by_industry,
                "Industry",
            );
            cols[1].label(RichText::new("Average Sustainability Score by Location").strong());
            ChartPlotter::draw_group_bars(
                &mut cols[1],
                "location_bars",
                &view.analysis.by_location,
                "Location",
            );
        });

        if !view.analysis.certification_means.is_empty() {
            ui.add_space(CARD_SPACING);
            ui.label(RichText::new("Average Sustainability Score by Certification").strong());
            ChartPlotter::draw_certification_bars(ui, &view.analysis.certification_means);
        }

        ui.add_space(CARD_SPACING);
        ui.label(RichText::new("Industry statistics (each group vs the rest, Welch t-test)").strong());
        ChartPlotter::draw_stats_table(ui, "industry", &view.analysis.by_industry);
        ui.add_space(8.0);
        ui.label(RichText::new("Location statistics").strong());
        ChartPlotter::draw_stats_table(ui, "location", &view.analysis.by_location);
    }

    fn supplier_picker<'a>(
        ui: &mut egui::Ui,
        id: &str,
        label: &str,
        selected: &mut Option<String>,
        options: impl Iterator<Item = &'a Supplier>,
    ) -> bool {
        let options: Vec<&Supplier> = options.collect();
        let mut changed = false;
        ui.horizontal(|ui| {
            ui.label(label);
            let text = Self::selected_label(selected.as_deref(), &options);
            ComboBox::from_id_salt(id)
                .width(240.0)
                .selected_text(text)
                .show_ui(ui, |ui| {
                    for s in &options {
                        let is_selected = selected.as_deref() == Some(s.supplier_id.as_str());
                        if ui.selectable_label(is_selected, s.display_name()).clicked() && !is_selected {
                            *selected = Some(s.supplier_id.clone());
                            changed = true;
                        }
                    }
                });
        });
        changed
    }

    fn selected_label(selected: Option<&str>, options: &[&Supplier]) -> String {
        match selected {
            Some(id) => options
                .iter()
                .find(|s| s.supplier_id == id)
                .map(|s| s.display_name())
                .unwrap_or_else(|| id.to_string()),
            None => "Select…".to_string(),
        }
    }

    fn show_scenario(&mut self, ui: &mut egui::Ui, view: &ViewContext) {
        Self::heading(ui, "Scenario Simulation");
        ui.label("Compare different supplier choices and their environmental impacts.");
        ui.add_space(8.0);

        let mut changed = false;
        ui.columns(2, |cols| {
            changed |= Self::supplier_picker(
                &mut cols[0],
                "current_supplier",
                "Current Supplier",
                &mut self.current_id,
                view.analysis.suppliers(),
            );
            changed |= Self::supplier_picker(
                &mut cols[1],
                "alternative_supplier",
                "Alternative Supplier",
                &mut self.alternative_id,
                view.dataset.suppliers.iter(),
            );
        });
        if changed {
            self.refresh_scenario(view.dataset, view.analysis);
        }

        let impact = match &self.scenario {
            None => {
                ui.label(RichText::new("Pick a current and an alternative supplier.").color(Color32::GRAY));
                return;
            }
            Some(Err(e)) => {
                ui.label(RichText::new(e.to_string()).color(WARNING_COLOR));
                return;
            }
            Some(Ok(impact)) => impact,
        };

        ui.add_space(CARD_SPACING);
        ui.label(RichText::new("Environmental Impact Comparison").strong());
        ChartPlotter::draw_comparison_bars(ui, &impact.comparison);

        ui.add_space(CARD_SPACING);
        ui.columns(2, |cols| {
            cols[0].label(
                RichText::new("Improvements")
                    .strong()
                    .color(Color32::from_rgb(40, 167, 69)),
            );
            for m in impact.comparison.improvements() {
                cols[0].label(format!("✅ {}", m));
            }
            cols[1].label(
                RichText::new("Potential Declines")
                    .strong()
                    .color(Color32::from_rgb(220, 53, 69)),
            );
            for m in impact.comparison.declines() {
                cols[1].label(format!("⚠ {}", m));
            }
        });

        ui.add_space(CARD_SPACING);
        ui.label(RichText::new("Portfolio after substitution").strong());
        Grid::new("portfolio_impact")
            .striped(true)
            .spacing([16.0, 4.0])
            .show(ui, |ui| {
                for h in ["", "Before", "After", "Change"] {
                    ui.label(RichText::new(h).strong());
                }
                ui.end_row();

                let rows = [
                    (
                        "Sustainability Score",
                        impact.before.avg_sustainability_score,
                        impact.after.avg_sustainability_score,
                    ),
                    (
                        "Carbon Footprint",
                        impact.before.avg_carbon_footprint,
                        impact.after.avg_carbon_footprint,
                    ),
                    (
                        "Recycling Rate",
                        impact.before.avg_recycling_rate,
                        impact.after.avg_recycling_rate,
                    ),
                    (
                        "Energy Efficiency",
                        impact.before.avg_energy_efficiency,
                        impact.after.avg_energy_efficiency,
                    ),
                ];
                for (label, before, after) in rows {
                    ui.label(label);
                    ui.label(format!("{:.2}", before));
                    ui.label(format!("{:.2}", after));
                    ui.label(format!("{:+.2}", after - before));
                    ui.end_row();
                }
            });
        ui.label(format!(
            "Sustainability score difference between suppliers: {:+.2} (portfolio average {:+.2})",
            impact.comparison.score_delta,
            impact.score_change()
        ));
    }

    fn show_details(&mut self, ui: &mut egui::Ui, view: &ViewContext) {
        Self::heading(ui, "Supplier Details");
        Self::supplier_picker(
            ui,
            "detail_supplier",
            "Select a supplier to view details",
            &mut self.detail_id,
            view.analysis.suppliers(),
        );

        let Some(scored) = self.detail_id.as_deref().and_then(|id| view.analysis.find(id)) else {
            return;
        };
        let s = &scored.supplier;

        ui.add_space(8.0);
        ui.columns(2, |cols| {
            cols[0].label(RichText::new("Basic Information").strong());
            cols[0].label(format!("Industry: {}", s.industry));
            cols[0].label(format!("Location: {}", s.location));
            cols[0].label(format!("Lead Time: {} days", s.lead_time_days));
            cols[0].label(format!("Onboarding Cost: ${:.2}", s.onboarding_cost_usd));
            cols[0].label(format!("Switching Cost: ${:.2}", s.switching_cost_usd));
            cols[0].add_space(6.0);
            cols[0].label(RichText::new("Certifications").strong());
            if s.certifications.is_empty() {
                cols[0].label("No certifications");
            }
            for cert in s.certifications.iter() {
                cols[0].label(format!("✅ {}", cert));
            }

            cols[1].label(RichText::new("Sustainability Metrics").strong());
            cols[1].label(format!("Sustainability Score: {:.2}", s.sustainability_score));
            cols[1].label(format!("Carbon Footprint: {:.2}", s.carbon_footprint));
            cols[1].label(format!("Recycling Rate: {:.2}%", s.recycling_rate));
            cols[1].label(format!("Energy Efficiency: {:.2}%", s.energy_efficiency));
            cols[1].label(format!("Water Usage: {:.2}", s.water_usage));
            cols[1].label(format!("Waste Production: {:.2}", s.waste_production));
        });

        ui.add_space(CARD_SPACING);
        ui.label(RichText::new("Sustainability Metrics Radar Chart").strong());
        let axes = SubScores::of(s).environmental();
        let labels: Vec<&str> = axes.iter().map(|(l, _)| *l).collect();
        ChartPlotter::draw_radar(
            ui,
            "detail_radar",
            &labels,
            &[RadarSeries {
                name: s.name.clone(),
                values: axes.iter().map(|(_, v)| *v).collect(),
            }],
            100.0,
        );
    }

    fn show_buyer(ui: &mut egui::Ui, view: &ViewContext) {
        Self::heading(ui, "Supplier Analysis Based on Buyer Requirements");

        let w = view.settings.buyer_weights.normalized();
        ui.label("This analysis ranks suppliers based on your specific requirements:");
        for (label, value) in [
            ("Sustainability Importance", w.sustainability),
            ("Lead Time Importance", w.lead_time),
            ("Onboarding Cost Importance", w.onboarding_cost),
            ("Switching Cost Importance", w.switching_cost),
        ] {
            ui.label(format!("  • {}: {:.0}%", label, value * 100.0));
        }

        let top = view.analysis.top_by_weighted_score(10);

        ui.add_space(8.0);
        ui.columns(2, |cols| {
            cols[0].label(RichText::new("Top Suppliers Based on Your Requirements").strong());
            Grid::new("buyer_table")
                .striped(true)
                .spacing([10.0, 4.0])
                .show(&mut cols[0], |ui| {
                    for h in ["Name", "Industry", "Location", "Weighted", "Score", "Lead", "Onboarding", "Switching"] {
                        ui.label(RichText::new(h).strong().size(11.0));
                    }
                    ui.end_row();
                    for r in &top {
                        let s = &r.supplier;
                        ui.label(&s.name);
                        ui.label(&s.industry);
                        ui.label(&s.location);
                        ui.label(format!("{:.3}", r.weighted_score));
                        ui.label(format!("{:.3}", s.sustainability_score));
                        ui.label(format!("{:.1}", s.lead_time_days));
                        ui.label(format!("{:.0}", s.onboarding_cost_usd));
                        ui.label(format!("{:.0}", s.switching_cost_usd));
                        ui.end_row();
                    }
                });

            cols[1].label(RichText::new("Top 3 Suppliers Comparison").strong());
            let series: Vec<RadarSeries> = top
                .iter()
                .take(3)
                .map(|r| RadarSeries {
                    name: r.supplier.name.clone(),
                    values: r.profile.axes().iter().map(|(_, v)| *v).collect(),
                })
                .collect();
            let labels: Vec<&str> = top
                .first()
                .map(|r| r.profile.axes().iter().map(|(l, _)| *l).collect())
                .unwrap_or_default();
            ChartPlotter::draw_radar(&mut cols[1], "buyer_radar", &labels, &series, 1.0);
        });

        ui.add_space(CARD_SPACING);
        ui.label(RichText::new("Sustainability vs Procurement Factors").strong());
        ui.columns(2, |cols| {
            ChartPlotter::draw_tradeoff_scatter(
                &mut cols[0],
                "tradeoff_lead_time",
                &view.analysis.ranked,
                view.industries,
                ("Lead Time (days)", "Sustainability Score"),
                |r| [r.supplier.lead_time_days, r.supplier.sustainability_score],
            );
            ChartPlotter::draw_tradeoff_scatter(
                &mut cols[1],
                "tradeoff_onboarding",
                &view.analysis.ranked,
                view.industries,
                ("Onboarding Cost ($)", "Sustainability Score"),
                |r| [r.supplier.onboarding_cost_usd, r.supplier.sustainability_score],
            );
        });

        ui.add_space(CARD_SPACING);
        ui.label(RichText::new("Trade-off: Sustainability vs Cost Efficiency (Normalized)").strong());
        ChartPlotter::draw_tradeoff_scatter(
            ui,
            "tradeoff_normalized",
            &view.analysis.ranked,
            view.industries,
            (
                "Sustainability (Higher is better)",
                "Cost Efficiency (Higher is better)",
            ),
            |r| [r.profile.sustainability, r.profile.onboarding_cost],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SupplierLoader;

    #[test]
    fn test_selected_label_uses_display_name() {
        let dataset = SupplierLoader::default().load_default().unwrap();
        let options: Vec<&Supplier> = dataset.suppliers.iter().collect();

        assert_eq!(
            ChartViewer::selected_label(Some("7"), &options),
            "Supplier 7 (#7)"
        );
        assert_eq!(ChartViewer::selected_label(Some("999"), &options), "999");
        assert_eq!(ChartViewer::selected_label(None, &options), "Select…");
    }
}
