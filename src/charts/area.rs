//! Area Chart Module
//! Renders the grouped table as a layered area chart using egui_plot.

use egui::Color32;
use egui_plot::{Corner, Legend, Line, Plot, PlotPoints};
use polars::prelude::*;

use crate::data::{AggregateError, ViewDimension, COL_CASES, COL_YEAR};

/// Color palette for chart series
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(255, 87, 34),   // Deep Orange
    Color32::from_rgb(121, 85, 72),   // Brown
];

/// One chart series: a dimension value and its per-year totals.
/// X holds the ordinal position of the year, Y the case count.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// Chart-ready view of the grouped table.
#[derive(Debug, Clone, Default)]
pub struct ChartData {
    pub years: Vec<i32>,
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    /// Extract per-series points from the long-form grouped table.
    ///
    /// Years are treated as ordered categories: each point's x is the index
    /// of its year among the distinct years present, not the year itself.
    pub fn from_grouped(
        grouped: &DataFrame,
        dimension: ViewDimension,
    ) -> Result<Self, AggregateError> {
        if grouped.height() == 0 {
            return Ok(Self::default());
        }

        let years_col = grouped.column(COL_YEAR)?.cast(&DataType::Int32)?;
        let years_ca = years_col.i32()?;
        let cases_col = grouped.column(COL_CASES)?.cast(&DataType::Float64)?;
        let cases_ca = cases_col.f64()?;

        let mut years: Vec<i32> = years_ca.into_iter().flatten().collect();
        years.sort_unstable();
        years.dedup();

        // Total view has no label column and a single implicit series.
        let labels = match dimension.column() {
            Some(dim_col) => Some(grouped.column(dim_col)?.str()?),
            None => None,
        };

        let mut series: Vec<ChartSeries> = Vec::new();
        for i in 0..grouped.height() {
            let (Some(year), Some(cases)) = (years_ca.get(i), cases_ca.get(i)) else {
                continue;
            };
            let name = match &labels {
                None => COL_CASES.to_string(),
                Some(labels) => match labels.get(i) {
                    Some(label) => label.to_string(),
                    None => continue,
                },
            };

            let Some(x) = years.iter().position(|&y| y == year) else {
                continue;
            };
            let point = [x as f64, cases];

            match series.iter_mut().find(|s| s.name == name) {
                Some(s) => s.points.push(point),
                None => series.push(ChartSeries {
                    name,
                    points: vec![point],
                }),
            }
        }

        Ok(Self { years, series })
    }
}

/// Label for an x-axis grid mark: the year at that ordinal position.
/// Negative, fractional and out-of-range positions get no label.
fn year_axis_label(value: f64, year_labels: &[String]) -> String {
    if value < -1e-6 || (value - value.round()).abs() > 1e-6 {
        return String::new();
    }
    let idx = value.round() as usize;
    year_labels.get(idx).cloned().unwrap_or_default()
}

/// Draws the layered area chart.
pub struct AreaChart;

impl AreaChart {
    /// Get color for a series.
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Draw the chart: one translucent area per series, filled down to zero,
    /// years as discrete x-axis categories.
    pub fn show(ui: &mut egui::Ui, data: &ChartData) {
        let year_labels: Vec<String> = data.years.iter().map(|y| y.to_string()).collect();

        Plot::new("influenza_area_chart")
            .height(340.0)
            .allow_scroll(false)
            .x_axis_label(COL_YEAR)
            .y_axis_label(COL_CASES)
            .legend(Legend::default().position(Corner::LeftTop))
            .x_axis_formatter(move |mark, _range| year_axis_label(mark.value, &year_labels))
            .show(ui, |plot_ui| {
                for (i, series) in data.series.iter().enumerate() {
                    let color = Self::series_color(i);
                    let points: PlotPoints = series.points.iter().copied().collect();
                    plot_ui.line(
                        Line::new(points)
                            .color(color.gamma_multiply(0.8))
                            .width(1.5)
                            .fill(0.0)
                            .name(&series.name),
                    );
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Aggregator, COL_PLACE, COL_REGION};

    fn cleaned_fixture() -> DataFrame {
        DataFrame::new(vec![
            Column::new(COL_REGION.into(), ["Africa", "Africa", "Americas"]),
            Column::new(COL_PLACE.into(), ["Nigeria", "Nigeria", "Brazil"]),
            Column::new(COL_YEAR.into(), [2022i32, 2023, 2023]),
            Column::new(COL_CASES.into(), [4i64, 8, 10]),
        ])
        .unwrap()
    }

    #[test]
    fn one_series_per_dimension_value() {
        let df = cleaned_fixture();
        let (grouped, _) = Aggregator::aggregate(&df, ViewDimension::ByRegion, &[]).unwrap();
        let chart = ChartData::from_grouped(&grouped, ViewDimension::ByRegion).unwrap();

        assert_eq!(chart.years, vec![2022, 2023]);
        assert_eq!(chart.series.len(), 2);

        let africa = chart.series.iter().find(|s| s.name == "Africa").unwrap();
        assert_eq!(africa.points, vec![[0.0, 4.0], [1.0, 8.0]]);

        // Americas only reported in 2023, so its series starts at x = 1.
        let americas = chart.series.iter().find(|s| s.name == "Americas").unwrap();
        assert_eq!(americas.points, vec![[1.0, 10.0]]);
    }

    #[test]
    fn total_view_has_a_single_series() {
        let df = cleaned_fixture();
        let (grouped, _) = Aggregator::aggregate(&df, ViewDimension::Total, &[]).unwrap();
        let chart = ChartData::from_grouped(&grouped, ViewDimension::Total).unwrap();

        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].name, COL_CASES);
        assert_eq!(chart.series[0].points, vec![[0.0, 4.0], [1.0, 18.0]]);
    }

    #[test]
    fn year_axis_labels_only_ordinal_positions() {
        let labels = vec!["2022".to_string(), "2023".to_string()];

        assert_eq!(year_axis_label(0.0, &labels), "2022");
        assert_eq!(year_axis_label(1.0, &labels), "2023");
        // Panning left of the first year must not repeat its label.
        assert_eq!(year_axis_label(-1.0, &labels), "");
        assert_eq!(year_axis_label(0.5, &labels), "");
        assert_eq!(year_axis_label(2.0, &labels), "");
    }

    #[test]
    fn empty_grouped_table_yields_empty_chart() {
        let df = DataFrame::new(vec![
            Column::new(COL_REGION.into(), Vec::<String>::new()),
            Column::new(COL_PLACE.into(), Vec::<String>::new()),
            Column::new(COL_YEAR.into(), Vec::<i32>::new()),
            Column::new(COL_CASES.into(), Vec::<i64>::new()),
        ])
        .unwrap();
        let (grouped, _) = Aggregator::aggregate(&df, ViewDimension::ByRegion, &[]).unwrap();
        let chart = ChartData::from_grouped(&grouped, ViewDimension::ByRegion).unwrap();

        assert!(chart.years.is_empty());
        assert!(chart.series.is_empty());
    }
}
