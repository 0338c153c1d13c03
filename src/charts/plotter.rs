//! Chart Plotter Module
//! Creates interactive dashboard visualizations using egui_plot.

use crate::data::{Certification, Supplier};
use crate::scenario::ScenarioComparison;
use crate::scoring::{RankingCriterion, ScoredSupplier};
use crate::stats::{GroupStats, HistogramBin, SIGNIFICANCE_THRESHOLD};
use egui::{Color32, RichText, Stroke};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoint,
    PlotPoints, Points, Polygon, Text,
};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

/// Color palette for groups
pub const PRIMARY_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const ALTERNATIVE_COLOR: Color32 = Color32::from_rgb(46, 204, 113); // Green

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

const SIGNIFICANT_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// One polygon on a radar chart: a name and one value per axis.
pub struct RadarSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Creates dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Stable color for a category, by its position in the sorted category list.
    pub fn category_color(categories: &[String], category: &str) -> Color32 {
        let idx = categories.iter().position(|c| c == category).unwrap_or(0);
        PALETTE[idx % PALETTE.len()]
    }

    fn height(full_size: bool) -> f32 {
        if full_size {
            320.0
        } else {
            220.0
        }
    }

    /// Category labels on integer ticks only.
    fn label_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
        move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        }
    }

    /// Distribution of sustainability scores.
    pub fn draw_score_histogram(ui: &mut egui::Ui, bins: &[HistogramBin], full_size: bool) {
        let bars: Vec<Bar> = bins
            .iter()
            .map(|b| {
                Bar::new((b.lower + b.upper) / 2.0, b.count as f64)
                    .width(b.upper - b.lower)
                    .name(format!("{:.1} - {:.1}", b.lower, b.upper))
                    .fill(PRIMARY_COLOR.gamma_multiply(0.8))
            })
            .collect();

        Plot::new("score_histogram")
            .height(Self::height(full_size))
            .allow_scroll(false)
            .x_axis_label("Sustainability Score")
            .y_axis_label("Suppliers")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Suppliers"));
            });
    }

    /// Score box plot per industry with supplier points overlaid.
    pub fn draw_score_box_by_industry(
        ui: &mut egui::Ui,
        groups: &[GroupStats],
        suppliers: &[&Supplier],
        full_size: bool,
    ) {
        let labels: Vec<String> = groups.iter().map(|g| g.group_name.clone()).collect();

        Plot::new("score_box_by_industry")
            .height(Self::height(full_size))
            .allow_scroll(false)
            .x_axis_label("Industry")
            .y_axis_label("Sustainability Score")
            .x_axis_formatter(Self::label_formatter(labels))
            .show(ui, |plot_ui| {
                for (i, group) in groups.iter().enumerate() {
                    let color = PALETTE[i % PALETTE.len()];
                    let x = i as f64;

                    let elem = BoxElem::new(
                        x,
                        BoxSpread::new(group.min, group.q1, group.median, group.q3, group.max),
                    )
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(Stroke::new(1.5, color));
                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&group.group_name));

                    let points: PlotPoints = suppliers
                        .iter()
                        .filter(|s| s.industry == group.group_name)
                        .map(|s| [x, s.sustainability_score])
                        .collect();
                    plot_ui.points(Points::new(points).radius(2.5).color(color.gamma_multiply(0.7)));
                }
            });
    }

    /// Carbon footprint against energy efficiency, sized by score, colored by industry.
    pub fn draw_carbon_energy_scatter(
        ui: &mut egui::Ui,
        suppliers: &[&Supplier],
        industries: &[String],
        full_size: bool,
    ) {
        Plot::new("carbon_energy_scatter")
            .height(Self::height(full_size))
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Carbon Footprint")
            .y_axis_label("Energy Efficiency (%)")
            .show(ui, |plot_ui| {
                for s in suppliers {
                    let color = Self::category_color(industries, &s.industry);
                    let radius = 2.0 + (s.sustainability_score.max(0.0) / 100.0) as f32 * 8.0;
                    plot_ui.points(
                        Points::new(vec![[s.carbon_footprint, s.energy_efficiency]])
                            .radius(radius)
                            .color(color.gamma_multiply(0.8))
                            .name(&s.industry),
                    );
                }
            });
    }

    /// Bars of the ranked rows. Shows the weighted score when ranking by it,
    /// otherwise the sustainability score.
    pub fn draw_ranked_bars(
        ui: &mut egui::Ui,
        rows: &[ScoredSupplier],
        criterion: RankingCriterion,
        industries: &[String],
    ) {
        let by_weighted = criterion == RankingCriterion::WeightedScore;
        let labels: Vec<String> = rows.iter().map(|r| r.supplier.display_name()).collect();

        let bars: Vec<Bar> = rows
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let value = if by_weighted {
                    r.weighted_score
                } else {
                    r.supplier.sustainability_score
                };
                Bar::new(i as f64, value)
                    .width(0.7)
                    .name(format!("{} ({})", r.supplier.display_name(), r.supplier.industry))
                    .fill(Self::category_color(industries, &r.supplier.industry))
            })
            .collect();

        let y_label = if by_weighted {
            "Weighted Score"
        } else {
            "Sustainability Score"
        };

        Plot::new("ranked_bars")
            .height(Self::height(true))
            .allow_scroll(false)
            .y_axis_label(y_label)
            .x_axis_formatter(Self::label_formatter(labels))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }

    /// Average score per group.
    pub fn draw_group_bars(ui: &mut egui::Ui, id: &str, groups: &[GroupStats], x_label: &str) {
        let labels: Vec<String> = groups.iter().map(|g| g.group_name.clone()).collect();
        let bars: Vec<Bar> = groups
            .iter()
            .enumerate()
            .map(|(i, g)| {
                let color = if g.is_significant {
                    SIGNIFICANT_COLOR
                } else {
                    PRIMARY_COLOR
                };
                Bar::new(i as f64, g.mean)
                    .width(0.6)
                    .name(&g.group_name)
                    .fill(color.gamma_multiply(0.8))
            })
            .collect();

        Plot::new(id)
            .height(Self::height(false))
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label("Average Score")
            .x_axis_formatter(Self::label_formatter(labels))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }

    pub fn draw_certification_bars(ui: &mut egui::Ui, means: &[(Certification, f64)]) {
        let labels: Vec<String> = means.iter().map(|(c, _)| c.label().to_string()).collect();
        let bars: Vec<Bar> = means
            .iter()
            .enumerate()
            .map(|(i, (cert, mean))| {
                Bar::new(i as f64, *mean)
                    .width(0.6)
                    .name(cert.label())
                    .fill(PALETTE[i % PALETTE.len()])
            })
            .collect();

        Plot::new("certification_bars")
            .height(Self::height(false))
            .allow_scroll(false)
            .y_axis_label("Average Score")
            .x_axis_formatter(Self::label_formatter(labels))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }

    /// Grouped current/alternative bars per environmental metric.
    pub fn draw_comparison_bars(ui: &mut egui::Ui, comparison: &ScenarioComparison) {
        let labels: Vec<String> = comparison
            .impacts
            .iter()
            .map(|i| i.metric.label().to_string())
            .collect();

        let current: Vec<Bar> = comparison
            .impacts
            .iter()
            .enumerate()
            .map(|(i, m)| Bar::new(i as f64 - 0.18, m.current).width(0.35))
            .collect();
        let alternative: Vec<Bar> = comparison
            .impacts
            .iter()
            .enumerate()
            .map(|(i, m)| Bar::new(i as f64 + 0.18, m.alternative).width(0.35))
            .collect();

        Plot::new("scenario_comparison")
            .height(Self::height(true))
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_formatter(Self::label_formatter(labels))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(current)
                        .name(format!("Current: {}", comparison.current.display_name()))
                        .color(PRIMARY_COLOR),
                );
                plot_ui.bar_chart(
                    BarChart::new(alternative)
                        .name(format!("Alternative: {}", comparison.alternative.display_name()))
                        .color(ALTERNATIVE_COLOR),
                );
            });
    }

    fn radar_point(axis: usize, axes: usize, radius: f64) -> [f64; 2] {
        let angle = FRAC_PI_2 - TAU * axis as f64 / axes as f64;
        [radius * angle.cos(), radius * angle.sin()]
    }

    /// Radar chart with values scaled by `max` onto the unit circle.
    pub fn draw_radar(
        ui: &mut egui::Ui,
        id: &str,
        axes: &[&str],
        series: &[RadarSeries],
        max: f64,
    ) {
        let n = axes.len();
        if n < 3 {
            return;
        }

        Plot::new(id)
            .height(Self::height(true))
            .data_aspect(1.0)
            .legend(Legend::default())
            .show_axes(false)
            .show_grid(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .include_x(-1.4)
            .include_x(1.4)
            .include_y(-1.25)
            .include_y(1.25)
            .show(ui, |plot_ui| {
                let web = Color32::from_gray(170);
                for level in [0.25, 0.5, 0.75, 1.0] {
                    let ring: PlotPoints = (0..=n)
                        .map(|k| Self::radar_point(k % n, n, level))
                        .collect();
                    plot_ui.line(Line::new(ring).color(web).width(0.5));
                }

                for (k, label) in axes.iter().enumerate() {
                    let spoke: PlotPoints =
                        vec![[0.0, 0.0], Self::radar_point(k, n, 1.0)].into();
                    plot_ui.line(Line::new(spoke).color(web).width(0.5));

                    let [x, y] = Self::radar_point(k, n, 1.15);
                    plot_ui.text(Text::new(PlotPoint::new(x, y), RichText::new(*label).size(11.0)));
                }

                for (i, s) in series.iter().enumerate() {
                    let color = if series.len() == 1 {
                        PRIMARY_COLOR
                    } else {
                        PALETTE[i % PALETTE.len()]
                    };
                    let points: PlotPoints = s
                        .values
                        .iter()
                        .enumerate()
                        .map(|(k, v)| {
                            let r = if max > 0.0 { (v / max).clamp(0.0, 1.0) } else { 0.0 };
                            Self::radar_point(k, n, r)
                        })
                        .collect();
                    plot_ui.polygon(
                        Polygon::new(points)
                            .fill_color(color.gamma_multiply(0.25))
                            .stroke(Stroke::new(1.5, color))
                            .name(&s.name),
                    );
                }
            });
    }

    /// Sustainability score against a procurement factor.
    /// Points of one industry, placed by `point`.
    pub fn tradeoff_points(
        rows: &[ScoredSupplier],
        industry: &str,
        point: fn(&ScoredSupplier) -> [f64; 2],
    ) -> Vec<[f64; 2]> {
        rows.iter()
            .filter(|r| r.supplier.industry == industry)
            .map(point)
            .collect()
    }

    /// Scatter of ranked suppliers coloured by industry.
    pub fn draw_tradeoff_scatter(
        ui: &mut egui::Ui,
        id: &str,
        rows: &[ScoredSupplier],
        industries: &[String],
        (x_label, y_label): (&str, &str),
        point: fn(&ScoredSupplier) -> [f64; 2],
    ) {
        Plot::new(id)
            .height(Self::height(false))
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .show(ui, |plot_ui| {
                for industry in industries {
                    let points: PlotPoints = Self::tradeoff_points(rows, industry, point)
                        .into_iter()
                        .collect();
                    plot_ui.points(
                        Points::new(points)
                            .radius(4.0)
                            .color(Self::category_color(industries, industry))
                            .name(industry),
                    );
                }
            });
    }

    /// Draw group statistics table
    pub fn draw_stats_table(ui: &mut egui::Ui, id: &str, groups: &[GroupStats]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("stats_table_{}", id)))
                    .striped(true)
                    .min_col_width(55.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Group", "N", "Mean", "Median", "Std", "Min", "Max", "P-value"] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        let default_text_color = ui.visuals().text_color();

                        for gs in groups {
                            let text_color = if gs.is_significant {
                                SIGNIFICANT_COLOR
                            } else {
                                default_text_color
                            };

                            ui.label(RichText::new(&gs.group_name).size(11.0).color(text_color));
                            ui.label(RichText::new(gs.count.to_string()).size(11.0));
                            for v in [gs.mean, gs.median, gs.std, gs.min, gs.max] {
                                let text = if v.is_nan() {
                                    "-".to_string()
                                } else {
                                    format!("{:.2}", v)
                                };
                                ui.label(RichText::new(text).size(11.0));
                            }

                            match gs.p_value {
                                Some(p) => ui.label(
                                    RichText::new(format!("{:.4}", p))
                                        .size(11.0)
                                        .color(text_color),
                                ),
                                None => ui.label(RichText::new("-").size(11.0)),
                            };
                            ui.end_row();
                        }
                    });
                ui.label(
                    RichText::new(format!(
                        "Highlighted groups differ from the other suppliers (Welch t-test, p < {})",
                        SIGNIFICANCE_THRESHOLD
                    ))
                    .size(10.0)
                    .color(Color32::GRAY),
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_color_is_stable() {
        let industries = vec!["Chemicals".to_string(), "Food".to_string()];
        assert_eq!(ChartPlotter::category_color(&industries, "Chemicals"), PALETTE[0]);
        assert_eq!(ChartPlotter::category_color(&industries, "Food"), PALETTE[1]);
    }

    #[test]
    fn test_radar_points_on_unit_circle() {
        let top = ChartPlotter::radar_point(0, 4, 1.0);
        assert!(top[0].abs() < 1e-12);
        assert!((top[1] - 1.0).abs() < 1e-12);

        let right = ChartPlotter::radar_point(1, 4, 0.5);
        assert!((right[0] - 0.5).abs() < 1e-12);
        assert!(right[1].abs() < 1e-12);
    }

    #[test]
    fn test_normalized_tradeoff_points() {
        use crate::analysis::{Analysis, AnalysisSettings};
        use crate::data::SupplierLoader;
        use crate::scoring::BuyerWeights;

        let mut dataset = SupplierLoader::default().load_default().unwrap();
        dataset.score(&crate::scoring::ScoringModel::Balanced);
        let settings = AnalysisSettings::for_dataset(&dataset, BuyerWeights::default());
        let analysis = Analysis::compute(&dataset, &settings);

        let mut total = 0;
        for industry in dataset.industries() {
            let points = ChartPlotter::tradeoff_points(&analysis.ranked, &industry, |r| {
                [r.profile.sustainability, r.profile.onboarding_cost]
            });
            assert!(points
                .iter()
                .all(|p| (0.0..=1.0).contains(&p[0]) && (0.0..=1.0).contains(&p[1])));
            total += points.len();
        }
        assert_eq!(total, analysis.ranked.len());
    }
}
