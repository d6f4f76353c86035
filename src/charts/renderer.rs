//! Static Chart Renderer
//! Draws the four analysis charts to PNG files with plotters.
//!
//! Charts:
//! 1. Bar: summed death rate per age group
//! 2. Line: yearly death rate for the top countries, one line each
//! 3. Heatmap: annotated correlation matrix with a color bar
//! 4. Pie: suicide count share by sex for a single year

use super::palette::{self, BAR_COLOR, TITLE_COLOR};
use crate::data::{CountrySeries, GroupTotal};
use crate::stats::CorrelationMatrix;
use plotters::coord::ranged1d::SegmentValue;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const BAR_FILE: &str = "1_bar_age_group.png";
pub const LINE_FILE: &str = "2_line_top_countries.png";
pub const HEATMAP_FILE: &str = "3_heatmap_correlation.png";
pub const PIE_FILE: &str = "4_pie_sex.png";

// figsize x 100 dpi
const BAR_SIZE: (u32, u32) = (1000, 600);
const LINE_SIZE: (u32, u32) = (1200, 800);
const HEATMAP_SIZE: (u32, u32) = (1200, 800);
const PIE_SIZE: (u32, u32) = (1000, 1000);

const FONT: &str = "sans-serif";

// room for the longest country name in the line chart legend
const LEGEND_WIDTH: i32 = 300;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Failed to prepare output directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("Nothing to plot for the {0} chart")]
    EmptyData(&'static str),
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Draw(e.to_string())
    }
}

/// Renders each chart into its own PNG under one output directory.
pub struct StaticChartRenderer {
    output_dir: PathBuf,
}

impl StaticChartRenderer {
    pub fn new(output_dir: &Path) -> Result<Self, ChartError> {
        fs::create_dir_all(output_dir)?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn title_style(size: u32) -> TextStyle<'static> {
        (FONT, size).into_font().style(FontStyle::Bold).into()
    }

    fn axis_style() -> TextStyle<'static> {
        (FONT, 20).into_font().style(FontStyle::Bold).into()
    }

    /// Label for a category axis position, blank outside the category list.
    fn segment_label(labels: &[String], value: &SegmentValue<i32>) -> String {
        match value {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => usize::try_from(*i)
                .ok()
                .and_then(|i| labels.get(i))
                .cloned()
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        }
    }

    /// Bar chart of summed death rate per age group.
    pub fn render_bar_chart(&self, totals: &[GroupTotal]) -> Result<PathBuf, ChartError> {
        if totals.is_empty() {
            return Err(ChartError::EmptyData("bar"));
        }
        let path = self.output_dir.join(BAR_FILE);
        let labels: Vec<String> = totals.iter().map(|g| g.label.clone()).collect();
        let y_max = totals.iter().map(|g| g.value).fold(0.0, f64::max);
        let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };
        let last = (totals.len() as i32 - 1).max(1);

        {
            let root = BitMapBackend::new(&path, BAR_SIZE).into_drawing_area();
            root.fill(&WHITE)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(
                    "Distribution of Suicide Rates by Age Group",
                    Self::title_style(30),
                )
                .margin(20)
                .x_label_area_size(130)
                .y_label_area_size(100)
                .build_cartesian_2d((0..last).into_segmented(), 0f64..y_top)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(labels.len())
                .x_label_formatter(&|v: &SegmentValue<i32>| Self::segment_label(&labels, v))
                .x_label_style(
                    (FONT, 16)
                        .into_font()
                        .style(FontStyle::Bold)
                        .transform(FontTransform::Rotate90),
                )
                .y_label_style((FONT, 16).into_font().style(FontStyle::Bold))
                .x_desc("Age Group")
                .y_desc("Total Death Rate per 100K")
                .axis_desc_style(Self::axis_style())
                .draw()?;

            chart.draw_series(
                Histogram::vertical(&chart)
                    .style(BAR_COLOR.filled())
                    .margin(12)
                    .data(totals.iter().enumerate().map(|(i, g)| (i as i32, g.value))),
            )?;

            root.present()?;
        }

        debug!(path = %path.display(), bars = totals.len(), "rendered bar chart");
        Ok(path)
    }

    /// Line chart with point markers, one line per country.
    pub fn render_line_chart(
        &self,
        series: &[CountrySeries],
        region: &str,
        year_start: i64,
        year_end: i64,
    ) -> Result<PathBuf, ChartError> {
        let values: Vec<f64> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|&(_, y)| y))
            .collect();
        if values.is_empty() {
            return Err(ChartError::EmptyData("line"));
        }
        let path = self.output_dir.join(LINE_FILE);

        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let pad = ((hi - lo) * 0.1).max(1.0);
        let title = format!(
            "Trends in Suicide Rates for Top {} Countries in {} ({}-{})",
            series.len(),
            region,
            year_start,
            year_end
        );

        {
            let root = BitMapBackend::new(&path, LINE_SIZE).into_drawing_area();
            root.fill(&WHITE)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(&title, Self::title_style(32).color(&TITLE_COLOR))
                .margin(25)
                .x_label_area_size(70)
                .y_label_area_size(90)
                .build_cartesian_2d(
                    year_start..year_end.max(year_start + 1),
                    (lo - pad).max(0.0)..(hi + pad),
                )?;

            chart
                .configure_mesh()
                .x_labels((year_end - year_start + 1) as usize)
                .x_label_formatter(&|y: &i64| y.to_string())
                .label_style((FONT, 18).into_font().style(FontStyle::Bold))
                .bold_line_style(BLACK.mix(0.15).stroke_width(1))
                .light_line_style(WHITE.stroke_width(0))
                .x_desc("Year")
                .y_desc("Death Rate per 100K")
                .axis_desc_style(Self::axis_style().color(&TITLE_COLOR))
                .draw()?;

            for (idx, s) in series.iter().enumerate() {
                let color = palette::series_color(idx);
                chart
                    .draw_series(LineSeries::new(s.points.iter().copied(), color.stroke_width(3)))?
                    .label(s.country.as_str())
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x - 10, y), (x + 10, y)], color.stroke_width(3))
                    });
                chart.draw_series(
                    s.points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 6, color.filled())),
                )?;
            }

            // Legend box anchored below its title, both relative to the plot area.
            let (plot_w, _) = chart.plotting_area().dim_in_pixel();
            let legend_x = plot_w as i32 - LEGEND_WIDTH;
            chart.plotting_area().strip_coord_spec().draw(&Text::new(
                "Country Name",
                (legend_x, 12),
                (FONT, 20).into_font().style(FontStyle::Bold),
            ))?;
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::Coordinate(legend_x, 40))
                .label_font((FONT, 20).into_font().style(FontStyle::Bold))
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;

            root.present()?;
        }

        debug!(path = %path.display(), lines = series.len(), "rendered line chart");
        Ok(path)
    }

    /// Annotated correlation heatmap. The first column is drawn as the top row.
    pub fn render_heatmap(&self, matrix: &CorrelationMatrix) -> Result<PathBuf, ChartError> {
        let n = matrix.columns.len();
        if n < 2 {
            return Err(ChartError::EmptyData("heatmap"));
        }
        let path = self.output_dir.join(HEATMAP_FILE);
        let last = n as i32 - 1;
        let x_labels = matrix.columns.clone();
        let y_labels: Vec<String> = matrix.columns.iter().rev().cloned().collect();

        let annot = TextStyle::from((FONT, 18).into_font().style(FontStyle::Bold))
            .pos(Pos::new(HPos::Center, VPos::Center));
        let dark_text = annot.color(&BLACK);
        let light_text = annot.color(&WHITE);

        {
            let root = BitMapBackend::new(&path, HEATMAP_SIZE).into_drawing_area();
            root.fill(&WHITE)?;
            let root = root.titled(
                "Correlation Matrix of Socioeconomic Factors",
                Self::title_style(30),
            )?;
            let (grid_area, bar_area) = root.split_horizontally(HEATMAP_SIZE.0 as i32 - 130);

            let mut chart = ChartBuilder::on(&grid_area)
                .margin(10)
                .x_label_area_size(200)
                .y_label_area_size(230)
                .build_cartesian_2d((0..last).into_segmented(), (0..last).into_segmented())?;

            chart
                .configure_mesh()
                .disable_mesh()
                .x_labels(n)
                .y_labels(n)
                .x_label_formatter(&|v: &SegmentValue<i32>| Self::segment_label(&x_labels, v))
                .y_label_formatter(&|v: &SegmentValue<i32>| Self::segment_label(&y_labels, v))
                .x_label_style(
                    (FONT, 16)
                        .into_font()
                        .style(FontStyle::Bold)
                        .transform(FontTransform::Rotate90),
                )
                .y_label_style((FONT, 16).into_font().style(FontStyle::Bold))
                .draw()?;

            let mut cells = Vec::with_capacity(n * n);
            let mut notes = Vec::with_capacity(n * n);
            for (i, row) in matrix.values.iter().enumerate() {
                let y = last - i as i32;
                for (j, &r) in row.iter().enumerate() {
                    let x = j as i32;
                    cells.push(Rectangle::new(
                        [
                            (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                            (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                        ],
                        palette::coolwarm(r).filled(),
                    ));
                    let style = if palette::needs_light_text(r) {
                        light_text.clone()
                    } else {
                        dark_text.clone()
                    };
                    let label = if r.is_nan() {
                        "NaN".to_string()
                    } else {
                        format!("{:.2}", r)
                    };
                    notes.push(Text::new(
                        label,
                        (SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)),
                        style,
                    ));
                }
            }
            chart.draw_series(cells)?;
            chart.draw_series(notes)?;

            Self::draw_color_bar(&bar_area)?;
            root.present()?;
        }

        debug!(path = %path.display(), columns = n, "rendered heatmap");
        Ok(path)
    }

    fn draw_color_bar(
        area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    ) -> Result<(), ChartError> {
        const STEPS: usize = 100;
        let mut bar = ChartBuilder::on(area)
            .margin_top(20)
            .margin_bottom(210)
            .margin_right(40)
            .y_label_area_size(55)
            .build_cartesian_2d(0f64..1f64, -1f64..1f64)?;

        bar.configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_labels(5)
            .y_label_formatter(&|v: &f64| format!("{:.1}", v))
            .draw()?;

        let step = 2.0 / STEPS as f64;
        bar.draw_series((0..STEPS).map(|k| {
            let lo = -1.0 + k as f64 * step;
            Rectangle::new(
                [(0.0, lo), (1.0, lo + step)],
                palette::coolwarm(lo + step / 2.0).filled(),
            )
        }))?;
        Ok(())
    }

    /// Pie chart of per-sex totals with percentage labels.
    pub fn render_pie_chart(&self, totals: &[GroupTotal], year: i64) -> Result<PathBuf, ChartError> {
        let sum: f64 = totals.iter().map(|g| g.value).sum();
        if totals.is_empty() || sum <= 0.0 {
            return Err(ChartError::EmptyData("pie"));
        }
        let path = self.output_dir.join(PIE_FILE);
        let title = format!("Distribution of Suicide Cases by Sex in {}", year);

        let sizes: Vec<f64> = totals.iter().map(|g| g.value).collect();
        let labels: Vec<String> = totals.iter().map(|g| g.label.clone()).collect();
        let colors: Vec<RGBColor> = (0..totals.len()).map(palette::pie_color).collect();

        {
            let root = BitMapBackend::new(&path, PIE_SIZE).into_drawing_area();
            root.fill(&WHITE)?;
            let root = root.titled(&title, Self::title_style(34))?;

            let (w, h) = root.dim_in_pixel();
            let center = (w as i32 / 2, h as i32 / 2);
            let radius = f64::from(w.min(h)) * 0.36;

            let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
            pie.start_angle(140.0);
            pie.label_style((FONT, 26).into_font().style(FontStyle::Bold));
            pie.label_offset(10.0);
            pie.percentages((FONT, 24).into_font().style(FontStyle::Bold).color(&BLACK));
            root.draw(&pie)?;

            root.present()?;
        }

        debug!(path = %path.display(), slices = totals.len(), "rendered pie chart");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_labels_resolve_indices() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            StaticChartRenderer::segment_label(&labels, &SegmentValue::CenterOf(1)),
            "b"
        );
        assert_eq!(
            StaticChartRenderer::segment_label(&labels, &SegmentValue::CenterOf(5)),
            ""
        );
        assert_eq!(
            StaticChartRenderer::segment_label(&labels, &SegmentValue::Last),
            ""
        );
    }

    #[test]
    fn empty_inputs_are_rejected_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = StaticChartRenderer::new(dir.path()).unwrap();

        assert!(matches!(
            renderer.render_bar_chart(&[]),
            Err(ChartError::EmptyData("bar"))
        ));
        assert!(matches!(
            renderer.render_line_chart(&[], "Europe", 2015, 2020),
            Err(ChartError::EmptyData("line"))
        ));
        let zero = [GroupTotal {
            label: "Male".into(),
            value: 0.0,
        }];
        assert!(matches!(
            renderer.render_pie_chart(&zero, 2015),
            Err(ChartError::EmptyData("pie"))
        ));
        let single = CorrelationMatrix {
            columns: vec!["GDP".into()],
            values: vec![vec![1.0]],
        };
        assert!(matches!(
            renderer.render_heatmap(&single),
            Err(ChartError::EmptyData("heatmap"))
        ));
    }

    /// Chart text goes through the system font; hosts without one skip drawing.
    fn sans_serif_resolves() -> bool {
        let found = (FONT, 12).into_font().box_size("Ag").is_ok();
        if !found {
            eprintln!("no {FONT} font on this host, skipping chart drawing");
        }
        found
    }

    fn assert_png(path: &Path, name: &str) {
        assert_eq!(path.file_name().unwrap(), name);
        assert!(fs::metadata(path).unwrap().len() > 0, "{}", path.display());
    }

    fn totals(pairs: &[(&str, f64)]) -> Vec<GroupTotal> {
        pairs
            .iter()
            .map(|&(label, value)| GroupTotal {
                label: label.to_string(),
                value,
            })
            .collect()
    }

    #[test]
    fn bar_chart_is_written() {
        if !sans_serif_resolves() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let renderer = StaticChartRenderer::new(dir.path()).unwrap();
        let ages = totals(&[("15-24 years", 85.0), ("25-34 years", 28.0), ("35-54 years", 11.0)]);
        let path = renderer.render_bar_chart(&ages).unwrap();
        assert_png(&path, BAR_FILE);
    }

    #[test]
    fn single_bar_is_written() {
        if !sans_serif_resolves() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let renderer = StaticChartRenderer::new(dir.path()).unwrap();
        let path = renderer
            .render_bar_chart(&totals(&[("15-24 years", 0.0)]))
            .unwrap();
        assert_png(&path, BAR_FILE);
    }

    #[test]
    fn line_chart_is_written() {
        if !sans_serif_resolves() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let renderer = StaticChartRenderer::new(dir.path()).unwrap();
        let series = vec![
            CountrySeries {
                country: "Lithuania".into(),
                points: vec![(2015, 30.0), (2016, 20.0)],
            },
            CountrySeries {
                country: "Latvia".into(),
                points: vec![(2015, 5.0), (2016, 25.0)],
            },
        ];
        let path = renderer
            .render_line_chart(&series, "Europe", 2015, 2020)
            .unwrap();
        assert_png(&path, LINE_FILE);
    }

    #[test]
    fn heatmap_is_written_with_undefined_cells() {
        if !sans_serif_resolves() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let renderer = StaticChartRenderer::new(dir.path()).unwrap();
        let matrix = CorrelationMatrix {
            columns: vec!["GDP".into(), "GNIPerCapita".into(), "InflationRate".into()],
            values: vec![
                vec![1.0, 0.8, f64::NAN],
                vec![0.8, 1.0, -0.3],
                vec![f64::NAN, -0.3, 1.0],
            ],
        };
        let path = renderer.render_heatmap(&matrix).unwrap();
        assert_png(&path, HEATMAP_FILE);
    }

    #[test]
    fn pie_chart_is_written() {
        if !sans_serif_resolves() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let renderer = StaticChartRenderer::new(dir.path()).unwrap();
        let sexes = totals(&[("Female", 15.0), ("Male", 120.0)]);
        let path = renderer.render_pie_chart(&sexes, 2015).unwrap();
        assert_png(&path, PIE_FILE);
    }

    #[test]
    fn new_creates_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("charts");
        let renderer = StaticChartRenderer::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(renderer.output_dir(), nested.as_path());
    }
}
