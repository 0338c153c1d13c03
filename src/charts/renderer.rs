//! Static Chart Renderer
//! Draws report charts as standalone SVG documents with plotters.
//!
//! Charts:
//! 1. Histogram of sustainability scores
//! 2. Labelled bar chart (rankings, group averages)
//! 3. Scatter coloured by category with a legend

use crate::stats::{HistogramBin, ValueRange};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use thiserror::Error;

// Colors
const BAR: RGBColor = RGBColor(52, 152, 219);
const BAR_EDGE: RGBColor = RGBColor(41, 128, 185);
const GRID: RGBColor = RGBColor(200, 200, 200);

const CAPTION_FONT: (&str, u32) = ("sans-serif", 22);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to draw for {0}")]
    NoData(String),
    #[error("Chart drawing failed: {0}")]
    Drawing(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Drawing(e.to_string())
    }
}

/// One named series of (x, y) points.
#[derive(Debug, Clone)]
pub struct ScatterGroup {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

pub struct StaticChartRenderer {
    width: u32,
    height: u32,
}

impl Default for StaticChartRenderer {
    fn default() -> Self {
        Self::new(900, 500)
    }
}

impl StaticChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(200),
            height: height.max(150),
        }
    }

    fn render<F>(&self, draw: F) -> Result<String, RenderError>
    where
        F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> Result<(), RenderError>,
    {
        let mut svg = String::new();
        {
            let root =
                SVGBackend::with_string(&mut svg, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE)?;
            draw(&root)?;
            root.present()?;
        }
        Ok(svg)
    }

    pub fn render_histogram(
        &self,
        title: &str,
        x_desc: &str,
        bins: &[HistogramBin],
    ) -> Result<String, RenderError> {
        let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
            return Err(RenderError::NoData(title.to_string()));
        };
        let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64 * 1.1;

        self.render(|root| {
            let mut chart = ChartBuilder::on(root)
                .caption(title, CAPTION_FONT)
                .margin(12)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(first.lower..last.upper, 0.0..y_max)?;

            chart
                .configure_mesh()
                .light_line_style(GRID.mix(0.3))
                .x_desc(x_desc)
                .y_desc("Suppliers")
                .x_label_formatter(&|v| format!("{:.0}", v))
                .y_label_formatter(&|v| format!("{:.0}", v))
                .draw()?;

            chart.draw_series(bins.iter().map(|b| {
                Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], BAR.mix(0.7).filled())
            }))?;
            chart.draw_series(bins.iter().filter(|b| b.count > 0).map(|b| {
                Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], BAR_EDGE.stroke_width(1))
            }))?;
            Ok(())
        })
    }

    /// Vertical bars, one per label, in the given order.
    pub fn render_bar_chart(
        &self,
        title: &str,
        y_desc: &str,
        bars: &[(String, f64)],
    ) -> Result<String, RenderError> {
        let Some(range) = ValueRange::of(bars.iter().map(|(_, v)| *v)) else {
            return Err(RenderError::NoData(title.to_string()));
        };
        let y_min = range.min.min(0.0);
        let y_max = if range.max > 0.0 { range.max * 1.1 } else { 1.0 };
        let labels: Vec<String> = bars.iter().map(|(l, _)| l.clone()).collect();
        let n = bars.len() as u32;

        self.render(|root| {
            let mut chart = ChartBuilder::on(root)
                .caption(title, CAPTION_FONT)
                .margin(12)
                .x_label_area_size(60)
                .y_label_area_size(50)
                .build_cartesian_2d((0u32..n).into_segmented(), y_min..y_max)?;

            let label_of = |v: &SegmentValue<u32>| match v {
                SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            };

            chart
                .configure_mesh()
                .disable_x_mesh()
                .light_line_style(GRID.mix(0.3))
                .x_labels(bars.len() + 1)
                .x_label_formatter(&label_of)
                .y_desc(y_desc)
                .draw()?;

            chart.draw_series(bars.iter().enumerate().map(|(i, (_, v))| {
                let i = i as u32;
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *v)],
                    Palette99::pick(i as usize).mix(0.8).filled(),
                );
                bar.set_margin(0, 0, 4, 4);
                bar
            }))?;
            Ok(())
        })
    }

    /// Points coloured per group, with a legend.
    pub fn render_scatter(
        &self,
        title: &str,
        axes: (&str, &str),
        groups: &[ScatterGroup],
    ) -> Result<String, RenderError> {
        let xs = ValueRange::of(groups.iter().flat_map(|g| g.points.iter().map(|p| p.0)));
        let ys = ValueRange::of(groups.iter().flat_map(|g| g.points.iter().map(|p| p.1)));
        let (Some(xs), Some(ys)) = (xs, ys) else {
            return Err(RenderError::NoData(title.to_string()));
        };
        let (x0, x1) = Self::padded(xs);
        let (y0, y1) = Self::padded(ys);

        self.render(|root| {
            let mut chart = ChartBuilder::on(root)
                .caption(title, CAPTION_FONT)
                .margin(12)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .light_line_style(GRID.mix(0.3))
                .x_desc(axes.0)
                .y_desc(axes.1)
                .draw()?;

            for (idx, group) in groups.iter().enumerate() {
                let color = Palette99::pick(idx).to_rgba();
                chart
                    .draw_series(
                        group
                            .points
                            .iter()
                            .map(move |&(x, y)| Circle::new((x, y), 4, color.mix(0.8).filled())),
                    )?
                    .label(group.name.as_str())
                    .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
            }

            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .position(SeriesLabelPosition::UpperRight)
                .draw()?;
            Ok(())
        })
    }

    /// Range widened by 5% on each side; degenerate ranges get a unit pad.
    fn padded(range: ValueRange) -> (f64, f64) {
        let pad = if range.span() > 0.0 {
            range.span() * 0.05
        } else {
            1.0
        };
        (range.min - pad, range.max + pad)
    }
}
