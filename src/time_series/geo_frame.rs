use crate::settings::GEOMETRY_NAME;
use crate::types::crs::Crs;
use geo::Point;
use polars::prelude::*;

/// A station-indexed time series with one location per row.
///
/// The wrapped [`DataFrame`] starts with the station identifier column, then holds one
/// `Float64` column per timestamp (named `%Y-%m-%d %H:%M:%S`, ascending) and ends with
/// a `geometry` column of WKT points. The typed points are kept alongside so they can be
/// drawn or reprojected without re-parsing the WKT.
#[derive(Debug, Clone)]
pub struct TimeSeriesGeoFrame {
    frame: DataFrame,
    geometry: Vec<Point<f64>>,
    crs: Crs,
    station_id_name: String,
}

impl TimeSeriesGeoFrame {
    /// `frame` must already carry the WKT rendering of `geometry` as its last column.
    pub(crate) fn new(
        frame: DataFrame,
        geometry: Vec<Point<f64>>,
        crs: Crs,
        station_id_name: String,
    ) -> Self {
        Self {
            frame,
            geometry,
            crs,
            station_id_name,
        }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Station locations, one per row, in [`TimeSeriesGeoFrame::crs`].
    pub fn geometry(&self) -> &[Point<f64>] {
        &self.geometry
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn station_id_name(&self) -> &str {
        &self.station_id_name
    }

    /// Number of stations.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// The station labels, in row order.
    pub fn station_labels(&self) -> PolarsResult<Vec<String>> {
        Ok(self
            .frame
            .column(&self.station_id_name)?
            .str()?
            .into_iter()
            .map(|label| label.unwrap_or_default().to_string())
            .collect())
    }

    /// Names of the value columns, i.e. everything between the identifier and the geometry.
    pub fn timestamp_columns(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .filter(|name| {
                name.as_str() != self.station_id_name && name.as_str() != GEOMETRY_NAME
            })
            .map(|name| name.to_string())
            .collect()
    }

    /// The values of one timestamp column, one per station row.
    pub fn values(&self, column: &str) -> PolarsResult<Vec<Option<f64>>> {
        Ok(self
            .frame
            .column(column)?
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .collect())
    }

    /// Reprojects the station locations, rewriting the geometry column to match.
    pub fn to_crs(&self, crs: Crs) -> PolarsResult<TimeSeriesGeoFrame> {
        let geometry: Vec<Point<f64>> = self
            .geometry
            .iter()
            .map(|point| self.crs.transform(crs, point))
            .collect();
        let mut frame = self.frame.clone();
        frame.with_column(wkt_column(&geometry))?;
        Ok(TimeSeriesGeoFrame::new(
            frame,
            geometry,
            crs,
            self.station_id_name.clone(),
        ))
    }
}

pub(crate) fn wkt(point: &Point<f64>) -> String {
    format!("POINT ({} {})", point.x(), point.y())
}

pub(crate) fn wkt_column(geometry: &[Point<f64>]) -> Column {
    Column::new(
        GEOMETRY_NAME.into(),
        geometry.iter().map(wkt).collect::<Vec<_>>(),
    )
}
