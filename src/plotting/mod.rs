//! Rendering a [`TimeSeriesGeoFrame`] column as a colored station map.

pub mod basemap;
pub mod colormap;
pub mod error;

use crate::plotting::basemap::Basemap;
use crate::plotting::colormap::Colormap;
use crate::plotting::error::PlotError;
use crate::settings::{
    PLOT_ADD_BASEMAP, PLOT_LEGEND, PLOT_LEGEND_PAD, PLOT_LEGEND_SIZE, PLOT_MARKER_RADIUS,
    PLOT_SIZE,
};
use crate::time_series::geo_frame::TimeSeriesGeoFrame;
use crate::types::crs::Crs;
use bon::builder;
use geo::{coord, BoundingRect, MultiPoint, Point, Rect};
use log::{info, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const TITLE_HEIGHT: u32 = 36;
const LEGEND_LABEL_SPACE: (u32, u32) = (56, 20);
const LEGEND_STEPS: u32 = 64;
const FONT: &str = "sans-serif";

/// Map title.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Title {
    Off,
    /// The plotted column's name.
    #[default]
    Column,
    Label(String),
}

impl From<bool> for Title {
    fn from(show: bool) -> Self {
        if show {
            Title::Column
        } else {
            Title::Off
        }
    }
}

impl From<&str> for Title {
    fn from(label: &str) -> Self {
        Title::Label(label.to_string())
    }
}

impl From<String> for Title {
    fn from(label: String) -> Self {
        Title::Label(label)
    }
}

/// Side of the map the color bar is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LegendPosition {
    #[default]
    Right,
    Left,
    Top,
    Bottom,
}

impl LegendPosition {
    fn is_vertical(&self) -> bool {
        matches!(self, LegendPosition::Left | LegendPosition::Right)
    }
}

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

fn drawing_error(e: impl std::fmt::Display) -> PlotError {
    PlotError::Drawing(e.to_string())
}

/// Draws one timestamp column of `gdf` as colored station markers and returns the SVG
/// document.
///
/// Stations with a null value in the column are not drawn. The color scale spans the
/// column's minimum and maximum.
///
/// # Optional Builder Methods
///
/// * `.column(..)` - timestamp column to draw. Defaults to the first one.
/// * `.cmap(Colormap)` - defaults to [`Colormap::Coolwarm`].
/// * `.legend(bool)`, `.legend_position(..)` - color bar, shown on the right by default.
/// * `.legend_size(f64)`, `.legend_pad(f64)` - bar thickness and gap to the map, as
///   fractions of the figure size.
/// * `.title(..)` - `false`, `true` (the column name) or any label.
/// * `.add_basemap(bool)`, `.basemap(&dyn Basemap)`, `.attribution(..)` - background
///   imagery. Asking for a basemap without providing one only logs a warning.
/// * `.size((u32, u32))` - figure size in pixels, 800x600 by default.
///
/// # Errors
///
/// [`PlotError::UnknownColumn`] for a column that is not a timestamp column,
/// [`PlotError::NoValues`] when every station is null, and [`PlotError::Drawing`] or
/// [`PlotError::Basemap`] when rendering fails.
///
/// # Example
///
/// ```no_run
/// use agrometeo::{plot_map, AgrometeoDataset, AgrometeoError, Colormap};
///
/// # fn main() -> Result<(), AgrometeoError> {
/// let dataset = AgrometeoDataset::builder().region([6.5, 46.4, 6.8, 46.6]).build()?;
/// let gdf = dataset
///     .get_ts_gdf()
///     .variable("temperature")
///     .start_date("2022-03-22")
///     .end_date("2022-03-23")
///     .call()?;
/// let svg = plot_map(&gdf)
///     .cmap(Colormap::Viridis)
///     .title("Temperature")
///     .add_basemap(false)
///     .call()?;
/// std::fs::write("temperature.svg", svg).ok();
/// # Ok(())
/// # }
/// ```
#[builder]
pub fn plot_map<'a>(
    #[builder(start_fn)] gdf: &'a TimeSeriesGeoFrame,
    #[builder(into)] column: Option<String>,
    #[builder(default)] cmap: Colormap,
    #[builder(default = PLOT_LEGEND)] legend: bool,
    #[builder(default)] legend_position: LegendPosition,
    #[builder(default = PLOT_LEGEND_SIZE)] legend_size: f64,
    #[builder(default = PLOT_LEGEND_PAD)] legend_pad: f64,
    #[builder(into, default)] title: Title,
    #[builder(default = PLOT_ADD_BASEMAP)] add_basemap: bool,
    basemap: Option<&'a dyn Basemap>,
    #[builder(into)] attribution: Option<String>,
    #[builder(default = PLOT_SIZE)] size: (u32, u32),
) -> Result<String, PlotError> {
    let timestamp_columns = gdf.timestamp_columns();
    let column = match column {
        Some(column) if timestamp_columns.contains(&column) => column,
        Some(column) => return Err(PlotError::UnknownColumn(column)),
        None => timestamp_columns
            .into_iter()
            .next()
            .ok_or(PlotError::NoTimestampColumns)?,
    };

    let values = gdf.values(&column).map_err(drawing_error)?;
    let markers: Vec<(Point<f64>, f64)> = gdf
        .geometry()
        .iter()
        .zip(values)
        .filter_map(|(point, value)| value.filter(|v| v.is_finite()).map(|v| (*point, v)))
        .collect();
    if markers.is_empty() {
        return Err(PlotError::NoValues(column));
    }
    let (vmin, vmax) = markers
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| {
            (lo.min(*v), hi.max(*v))
        });

    let title = match title {
        Title::Off => None,
        Title::Column => Some(column.clone()),
        Title::Label(label) => Some(label),
    };
    let basemap = if add_basemap {
        if basemap.is_none() {
            warn!("No basemap provider given, drawing the map without a basemap");
        }
        basemap
    } else {
        None
    };
    let attribution = attribution.or_else(|| basemap.and_then(|b| b.attribution()));

    let map = StationMap {
        markers: &markers,
        crs: gdf.crs(),
        vmin,
        vmax,
        cmap,
        basemap,
        attribution: attribution.as_deref(),
    };
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let body = match &title {
            Some(title) => {
                let (title_area, body) = root.split_vertically(TITLE_HEIGHT);
                draw_title(&title_area, title)?;
                body
            }
            None => root.clone(),
        };

        if legend {
            let layout = LegendLayout::new(&body, legend_position, legend_size, legend_pad);
            let (map_area, legend_area) = layout.split(&body);
            map.draw(&map_area)?;
            map.draw_legend(&legend_area, layout)?;
        } else {
            map.draw(&body)?;
        }
        root.present().map_err(drawing_error)?;
    }
    info!("Plotted {} stations for '{}'", markers.len(), column);
    Ok(svg)
}

fn draw_title(area: &Area<'_>, title: &str) -> Result<(), PlotError> {
    let (width, _) = area.dim_in_pixel();
    let style = TextStyle::from((FONT, 20)).pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(
        title.to_string(),
        ((width / 2) as i32, (TITLE_HEIGHT / 2) as i32),
        style,
    ))
    .map_err(drawing_error)
}

/// Color bar thickness and its gap to the map, in pixels.
#[derive(Debug, Clone, Copy)]
struct LegendLayout {
    position: LegendPosition,
    bar: i32,
    pad: i32,
}

impl LegendLayout {
    fn new(area: &Area<'_>, position: LegendPosition, legend_size: f64, legend_pad: f64) -> Self {
        let (width, height) = area.dim_in_pixel();
        let extent = f64::from(if position.is_vertical() { width } else { height });
        Self {
            position,
            bar: (legend_size * extent).round().max(1.0) as i32,
            pad: (legend_pad * extent).round().max(0.0) as i32,
        }
    }

    fn label_space(&self) -> i32 {
        if self.position.is_vertical() {
            LEGEND_LABEL_SPACE.0 as i32
        } else {
            LEGEND_LABEL_SPACE.1 as i32
        }
    }

    /// Splits `area` into `(map, legend)`. The legend strip holds the gap, the bar and
    /// the labels, in that order going away from the map.
    fn split<'a>(&self, area: &Area<'a>) -> (Area<'a>, Area<'a>) {
        let (width, height) = area.dim_in_pixel();
        let extent = if self.position.is_vertical() { width } else { height };
        let strip = ((self.pad + self.bar + self.label_space()) as u32).min(extent / 2);
        match self.position {
            LegendPosition::Right => area.split_horizontally(width - strip),
            LegendPosition::Bottom => area.split_vertically(height - strip),
            LegendPosition::Left => {
                let (legend, map) = area.split_horizontally(strip);
                (map, legend)
            }
            LegendPosition::Top => {
                let (legend, map) = area.split_vertically(strip);
                (map, legend)
            }
        }
    }
}

struct StationMap<'a> {
    markers: &'a [(Point<f64>, f64)],
    crs: Crs,
    vmin: f64,
    vmax: f64,
    cmap: Colormap,
    basemap: Option<&'a dyn Basemap>,
    attribution: Option<&'a str>,
}

impl StationMap<'_> {
    fn normalize(&self, value: f64) -> f64 {
        if self.vmax > self.vmin {
            (value - self.vmin) / (self.vmax - self.vmin)
        } else {
            0.5
        }
    }

    /// Marker extent, padded so markers on the edge stay inside the plot.
    fn bounds(&self) -> Rect<f64> {
        let points = MultiPoint::new(self.markers.iter().map(|(p, _)| *p).collect());
        let rect = points
            .bounding_rect()
            .unwrap_or_else(|| Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 0.0, y: 0.0 }));
        let fallback = match self.crs {
            Crs::Wgs84 => 0.01,
            Crs::Lv03 => 1_000.0,
        };
        let pad = |span: f64| if span > 0.0 { span * 0.1 } else { fallback };
        let (px, py) = (pad(rect.width()), pad(rect.height()));
        Rect::new(
            coord! { x: rect.min().x - px, y: rect.min().y - py },
            coord! { x: rect.max().x + px, y: rect.max().y + py },
        )
    }

    fn draw(&self, area: &Area<'_>) -> Result<(), PlotError> {
        let bounds = self.bounds();
        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .build_cartesian_2d(
                bounds.min().x..bounds.max().x,
                bounds.min().y..bounds.max().y,
            )
            .map_err(drawing_error)?;

        if let Some(basemap) = self.basemap {
            for tile in basemap.tiles(bounds, self.crs, area.dim_in_pixel())? {
                let pixels = tile.pixels()?;
                chart
                    .draw_series(pixels.map(|(min, max, [r, g, b])| {
                        Rectangle::new([min, max], RGBColor(r, g, b).filled())
                    }))
                    .map_err(drawing_error)?;
            }
        }

        chart
            .draw_series(self.markers.iter().map(|(point, value)| {
                Circle::new(
                    (point.x(), point.y()),
                    PLOT_MARKER_RADIUS,
                    self.cmap.color(self.normalize(*value)).filled(),
                )
            }))
            .map_err(drawing_error)?;

        if let Some(attribution) = self.attribution {
            let (_, height) = area.dim_in_pixel();
            let style = TextStyle::from((FONT, 10)).pos(Pos::new(HPos::Left, VPos::Bottom));
            area.draw(&Text::new(
                attribution.to_string(),
                (12, height as i32 - 12),
                style,
            ))
            .map_err(drawing_error)?;
        }
        Ok(())
    }

    fn draw_legend(&self, area: &Area<'_>, layout: LegendLayout) -> Result<(), PlotError> {
        let (width, height) = area.dim_in_pixel();
        let (width, height) = (width as i32, height as i32);
        let margin = 10;
        let steps = LEGEND_STEPS as i32;
        let low = format!("{:.1}", self.vmin);
        let high = format!("{:.1}", self.vmax);
        let LegendLayout { position, bar, pad } = layout;

        if position.is_vertical() {
            let (x0, x1) = match position {
                LegendPosition::Left => (width - pad - bar, width - pad),
                _ => (pad, pad + bar),
            };
            let span = height - 2 * margin;
            for i in 0..steps {
                let y0 = margin + span * i / steps;
                let y1 = margin + span * (i + 1) / steps;
                let t = 1.0 - i as f64 / (steps - 1) as f64;
                area.draw(&Rectangle::new(
                    [(x0, y0), (x1, y1)],
                    self.cmap.color(t).filled(),
                ))
                .map_err(drawing_error)?;
            }
            let (x, anchor) = match position {
                LegendPosition::Left => (x0 - 4, HPos::Right),
                _ => (x1 + 4, HPos::Left),
            };
            let label = TextStyle::from((FONT, 12)).pos(Pos::new(anchor, VPos::Center));
            area.draw(&Text::new(high, (x, margin), label.clone()))
                .map_err(drawing_error)?;
            area.draw(&Text::new(low, (x, height - margin), label))
                .map_err(drawing_error)?;
        } else {
            let (y0, y1) = match position {
                LegendPosition::Top => (height - pad - bar, height - pad),
                _ => (pad, pad + bar),
            };
            let span = width - 2 * margin;
            for i in 0..steps {
                let x0 = margin + span * i / steps;
                let x1 = margin + span * (i + 1) / steps;
                let t = i as f64 / (steps - 1) as f64;
                area.draw(&Rectangle::new(
                    [(x0, y0), (x1, y1)],
                    self.cmap.color(t).filled(),
                ))
                .map_err(drawing_error)?;
            }
            let (y, anchor) = match position {
                LegendPosition::Top => (y0 - 2, VPos::Bottom),
                _ => (y1 + 2, VPos::Top),
            };
            let label = TextStyle::from((FONT, 12)).pos(Pos::new(HPos::Center, anchor));
            area.draw(&Text::new(low, (margin, y), label.clone()))
                .map_err(drawing_error)?;
            area.draw(&Text::new(high, (width - margin, y), label))
                .map_err(drawing_error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotting::basemap::BasemapTile;
    use crate::time_series::geo_frame::wkt_column;
    use geo::point;
    use polars::prelude::*;
    use std::cell::Cell;

    fn gdf() -> TimeSeriesGeoFrame {
        let geometry = vec![
            point!(x: 6.6617, y: 46.5106),
            point!(x: 6.67, y: 46.54),
            point!(x: 6.689, y: 46.503),
        ];
        let df = DataFrame::new(vec![
            Column::new("station_id".into(), ["Pully", "Epalinges", "Lutry"]),
            Column::new(
                "2022-06-01 00:00:00".into(),
                [Some(14.6), Some(13.1), None],
            ),
            Column::new("2022-06-01 00:10:00".into(), [None::<f64>, None, None]),
            wkt_column(&geometry),
        ])
        .unwrap();
        TimeSeriesGeoFrame::new(df, geometry, Crs::Wgs84, "station_id".to_string())
    }

    struct SolidBasemap {
        calls: Cell<usize>,
    }

    impl Basemap for SolidBasemap {
        fn tiles(
            &self,
            bounds: Rect<f64>,
            _crs: Crs,
            _size: (u32, u32),
        ) -> Result<Vec<BasemapTile>, PlotError> {
            self.calls.set(self.calls.get() + 1);
            Ok(vec![BasemapTile {
                bounds,
                width: 1,
                height: 1,
                rgb: vec![10, 20, 30],
            }])
        }

        fn attribution(&self) -> Option<String> {
            Some("Solid tiles".to_string())
        }
    }

    #[test]
    fn draws_one_marker_per_value_with_the_column_title() {
        let svg = plot_map(&gdf()).add_basemap(false).call().unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("2022-06-01 00:00:00"));
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn custom_titles_and_legend_positions() {
        for position in [
            LegendPosition::Right,
            LegendPosition::Left,
            LegendPosition::Top,
            LegendPosition::Bottom,
        ] {
            let svg = plot_map(&gdf())
                .title("Air temperature")
                .legend_position(position)
                .cmap(Colormap::Viridis)
                .add_basemap(false)
                .call()
                .unwrap();
            assert!(svg.contains("Air temperature"));
            assert!(svg.contains("14.6"));
            assert!(svg.contains("13.1"));
        }

        let svg = plot_map(&gdf())
            .title(false)
            .legend(false)
            .add_basemap(false)
            .call()
            .unwrap();
        assert!(!svg.contains("2022-06-01 00:00:00"));
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn basemap_is_drawn_under_the_markers() {
        let basemap = SolidBasemap { calls: Cell::new(0) };
        let svg = plot_map(&gdf()).basemap(&basemap).call().unwrap();
        assert_eq!(basemap.calls.get(), 1);
        assert!(svg.contains("Solid tiles"));
        let tile = svg.find("#0A141E").or_else(|| svg.find("#0a141e")).unwrap();
        let marker = svg.find("<circle").unwrap();
        assert!(tile < marker);
    }

    #[test]
    fn missing_basemap_only_degrades() {
        let svg = plot_map(&gdf()).attribution("Agrometeo").call().unwrap();
        assert!(svg.contains("Agrometeo"));
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn basemap_is_skipped_when_not_requested() {
        let basemap = SolidBasemap { calls: Cell::new(0) };
        plot_map(&gdf())
            .basemap(&basemap)
            .add_basemap(false)
            .call()
            .unwrap();
        assert_eq!(basemap.calls.get(), 0);
    }

    #[test]
    fn rejects_unknown_and_empty_columns() {
        assert!(matches!(
            plot_map(&gdf()).column("station_id").call(),
            Err(PlotError::UnknownColumn(column)) if column == "station_id"
        ));
        assert!(matches!(
            plot_map(&gdf()).column("2022-06-01 00:10:00").call(),
            Err(PlotError::NoValues(_))
        ));
    }
}
