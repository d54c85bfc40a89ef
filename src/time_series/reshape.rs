//! Pivoting the wide, time-indexed table into station-indexed and long layouts.

use crate::settings::GEOMETRY_NAME;
use crate::time_series::error::TimeSeriesError;
use crate::time_series::geo_frame::{wkt_column, TimeSeriesGeoFrame};
use crate::types::crs::Crs;
use crate::types::station::Station;
use chrono::{DateTime, NaiveDateTime};
use geo::Point;
use polars::prelude::*;
use std::collections::HashMap;

pub(crate) const TIMESTAMP_COLUMN_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reads the datetime column `time_name`, whatever its time unit.
pub(crate) fn timestamps(
    df: &DataFrame,
    time_name: &str,
) -> Result<Vec<NaiveDateTime>, TimeSeriesError> {
    let column = df.column(time_name)?;
    let unit = match column.dtype() {
        DataType::Datetime(unit, _) => *unit,
        other => {
            return Err(PolarsError::SchemaMismatch(
                format!("column '{time_name}' has type {other}, expected a datetime").into(),
            )
            .into())
        }
    };
    let physical = column.cast(&DataType::Int64)?;
    physical
        .i64()?
        .into_iter()
        .map(|value| {
            value
                .and_then(|v| match unit {
                    TimeUnit::Milliseconds => DateTime::from_timestamp_millis(v),
                    TimeUnit::Microseconds => DateTime::from_timestamp_micros(v),
                    TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(v)),
                })
                .map(|datetime| datetime.naive_utc())
                .ok_or_else(|| TimeSeriesError::InvalidTimestamp(format!("{value:?}")))
        })
        .collect()
}

fn station_columns<'a>(
    df: &'a DataFrame,
    time_name: &'a str,
) -> impl Iterator<Item = &'a Column> + 'a {
    df.get_columns()
        .iter()
        .filter(move |column| column.name().as_str() != time_name)
}

fn float_values(column: &Column) -> Result<Vec<Option<f64>>, TimeSeriesError> {
    Ok(column
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .collect())
}

/// Transposes a wide table into a [`TimeSeriesGeoFrame`]: one row per station column of
/// `df`, one column per timestamp in ascending order, and the station location last.
///
/// Station columns are matched to `stations` through [`Station::identifier`] under
/// `station_id_column`, the same labelling the wide table was built with.
pub(crate) fn to_geo_frame(
    df: &DataFrame,
    stations: &[Station],
    station_id_column: &str,
    time_name: &str,
    station_id_name: &str,
    crs: Crs,
) -> Result<TimeSeriesGeoFrame, TimeSeriesError> {
    if station_id_name == GEOMETRY_NAME {
        return Err(TimeSeriesError::ColumnNameClash(station_id_name.to_string()));
    }
    let times = timestamps(df, time_name)?;
    let mut order: Vec<usize> = (0..times.len()).collect();
    order.sort_by_key(|&row| times[row]);

    let locations: HashMap<String, Point<f64>> = stations
        .iter()
        .filter_map(|station| {
            station
                .identifier(station_id_column)
                .map(|label| (label, station.location))
        })
        .collect();

    let mut labels = Vec::new();
    let mut geometry = Vec::new();
    let mut series = Vec::new();
    for column in station_columns(df, time_name) {
        let label = column.name().to_string();
        let location = locations
            .get(&label)
            .copied()
            .ok_or_else(|| TimeSeriesError::MissingGeometry(label.clone()))?;
        series.push(float_values(column)?);
        geometry.push(location);
        labels.push(label);
    }

    let mut columns = Vec::with_capacity(order.len() + 2);
    columns.push(Column::new(station_id_name.into(), labels));
    for &row in &order {
        let name = times[row].format(TIMESTAMP_COLUMN_FORMAT).to_string();
        let values: Vec<Option<f64>> = series.iter().map(|values| values[row]).collect();
        columns.push(Column::new(name.into(), values));
    }
    columns.push(wkt_column(&geometry));

    Ok(TimeSeriesGeoFrame::new(
        DataFrame::new(columns)?,
        geometry,
        crs,
        station_id_name.to_string(),
    ))
}

/// Melts a wide table into `(time, station, value)` rows, ordered by station then time.
pub(crate) fn to_long_frame(
    df: &DataFrame,
    time_name: &str,
    station_id_name: &str,
    value_name: &str,
) -> Result<DataFrame, TimeSeriesError> {
    if station_id_name == time_name || value_name == time_name {
        return Err(TimeSeriesError::ColumnNameClash(time_name.to_string()));
    }
    if value_name == station_id_name {
        return Err(TimeSeriesError::ColumnNameClash(value_name.to_string()));
    }
    let times = timestamps(df, time_name)?;
    let mut long = DataFrame::new(vec![
        Column::new(time_name.into(), Vec::<NaiveDateTime>::new()),
        Column::new(station_id_name.into(), Vec::<String>::new()),
        Column::new(value_name.into(), Vec::<Option<f64>>::new()),
    ])?;
    for column in station_columns(df, time_name) {
        let label = column.name().to_string();
        let block = DataFrame::new(vec![
            Column::new(time_name.into(), times.clone()),
            Column::new(station_id_name.into(), vec![label; times.len()]),
            Column::new(value_name.into(), float_values(column)?),
        ])?;
        long.vstack_mut(&block)?;
    }
    long.align_chunks();
    Ok(long)
}
