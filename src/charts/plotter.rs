//! Chart Plotter Module
//! Favourites scatter and country time series using egui_plot.

use eurovision_dash::data::{CountryYearTotal, FavouriteCount};
use egui::Color32;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};
use std::collections::{BTreeMap, BTreeSet};

/// Country line colour
pub const LINE_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 6] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(233, 30, 99),  // Pink
];

const MIN_RADIUS: f32 = 2.0;
const MAX_RADIUS: f32 = 9.0;

/// Categorical axis: sorted country codes mapped to plot positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryAxis {
    labels: Vec<String>,
}

impl CountryAxis {
    pub fn new<'a>(codes: impl IntoIterator<Item = &'a str>) -> Self {
        let unique: BTreeSet<&str> = codes.into_iter().collect();
        Self {
            labels: unique.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn position(&self, code: &str) -> Option<f64> {
        self.labels
            .binary_search_by(|label| label.as_str().cmp(code))
            .ok()
            .map(|idx| idx as f64)
    }

    /// Label under a grid mark; blank between categories.
    pub fn label_at(&self, value: f64) -> String {
        if value < 0.0 || (value - value.round()).abs() > 1e-6 {
            return String::new();
        }
        self.labels
            .get(value.round() as usize)
            .cloned()
            .unwrap_or_default()
    }
}

/// Scatter data for the favourites chart, one series per award count.
#[derive(Debug, Clone, Default)]
pub struct FavouriteScatter {
    pub from_axis: CountryAxis,
    pub to_axis: CountryAxis,
    /// count -> [from position, to position]
    pub series: BTreeMap<u32, Vec<[f64; 2]>>,
    pub max_count: u32,
}

impl FavouriteScatter {
    pub fn new(rows: &[FavouriteCount]) -> Self {
        let from_axis = CountryAxis::new(rows.iter().map(|r| r.from_country.as_str()));
        let to_axis = CountryAxis::new(rows.iter().map(|r| r.to_country.as_str()));

        let mut series: BTreeMap<u32, Vec<[f64; 2]>> = BTreeMap::new();
        for row in rows {
            if let (Some(x), Some(y)) = (
                from_axis.position(&row.from_country),
                to_axis.position(&row.to_country),
            ) {
                series.entry(row.points).or_default().push([x, y]);
            }
        }
        let max_count = series.keys().next_back().copied().unwrap_or(0);

        Self {
            from_axis,
            to_axis,
            series,
            max_count,
        }
    }
}

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Marker radius scaled linearly between MIN_RADIUS and MAX_RADIUS.
    pub fn marker_radius(count: u32, max_count: u32) -> f32 {
        if max_count <= 1 {
            return MIN_RADIUS;
        }
        let t = (count.saturating_sub(1)) as f32 / (max_count - 1) as f32;
        MIN_RADIUS + t.clamp(0.0, 1.0) * (MAX_RADIUS - MIN_RADIUS)
    }

    /// Draw favourite pairs: giving country on X, receiving country on Y,
    /// marker size by number of 12-point awards.
    pub fn draw_favourites_chart(ui: &mut egui::Ui, scatter: &FavouriteScatter) {
        let x_axis = scatter.from_axis.clone();
        let y_axis = scatter.to_axis.clone();
        let hover_x = x_axis.clone();
        let hover_y = y_axis.clone();

        Plot::new("favourites")
            .legend(Legend::default())
            .x_axis_label("from_country")
            .y_axis_label("to_country")
            .x_axis_formatter(move |mark, _range| x_axis.label_at(mark.value))
            .y_axis_formatter(move |mark, _range| y_axis.label_at(mark.value))
            .label_formatter(move |_name, value| {
                format!(
                    "{} → {}",
                    hover_x.label_at(value.x.round()),
                    hover_y.label_at(value.y.round())
                )
            })
            .show(ui, |plot_ui| {
                for (idx, (count, points)) in scatter.series.iter().enumerate() {
                    let color = PALETTE[idx % PALETTE.len()];
                    plot_ui.points(
                        Points::new(PlotPoints::from(points.clone()))
                            .radius(Self::marker_radius(*count, scatter.max_count))
                            .color(color.gamma_multiply(0.8))
                            .name(format!("{count} × 12 points")),
                    );
                }
            });
    }

    /// Draw yearly points received by one country.
    pub fn draw_country_chart(ui: &mut egui::Ui, country: &str, totals: &[CountryYearTotal]) {
        let points: Vec<[f64; 2]> = totals
            .iter()
            .map(|t| [f64::from(t.year), t.points as f64])
            .collect();

        Plot::new(format!("country_{country}"))
            .x_axis_label("year")
            .y_axis_label("points")
            .include_y(0.0)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .color(LINE_COLOR)
                        .width(1.5)
                        .name(country),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .radius(3.0)
                        .color(LINE_COLOR),
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn favourite(from: &str, to: &str, points: u32) -> FavouriteCount {
        FavouriteCount {
            from_country: from.into(),
            to_country: to.into(),
            points,
        }
    }

    #[test]
    fn axis_maps_sorted_codes() {
        let axis = CountryAxis::new(["se", "dk", "no", "dk"]);
        assert_eq!(axis.position("dk"), Some(0.0));
        assert_eq!(axis.position("se"), Some(2.0));
        assert_eq!(axis.position("fi"), None);
        assert_eq!(axis.label_at(1.0), "no");
        assert_eq!(axis.label_at(1.5), "");
        assert_eq!(axis.label_at(-1.0), "");
        assert_eq!(axis.label_at(3.0), "");
    }

    #[test]
    fn scatter_groups_pairs_by_count() {
        let rows = [
            favourite("se", "no", 3),
            favourite("no", "se", 3),
            favourite("dk", "se", 1),
        ];
        let scatter = FavouriteScatter::new(&rows);

        assert_eq!(scatter.max_count, 3);
        assert_eq!(scatter.series[&1], vec![[0.0, 1.0]]);
        assert_eq!(scatter.series[&3].len(), 2);
    }

    #[test]
    fn radius_grows_with_count() {
        assert_eq!(ChartPlotter::marker_radius(1, 1), MIN_RADIUS);
        assert_eq!(ChartPlotter::marker_radius(1, 5), MIN_RADIUS);
        assert_eq!(ChartPlotter::marker_radius(5, 5), MAX_RADIUS);
        assert!(ChartPlotter::marker_radius(3, 5) > MIN_RADIUS);
    }
}
