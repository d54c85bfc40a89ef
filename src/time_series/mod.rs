//! Fetching measurements and shaping them into time-indexed, station-indexed and long tables.

pub mod error;
pub(crate) mod geo_frame;
pub(crate) mod parse;
pub(crate) mod request;
pub(crate) mod reshape;

use crate::http::HttpTransport;
use crate::settings::METEO_DATA_ENDPOINT;
use crate::time_series::error::TimeSeriesError;
use crate::time_series::parse::parse_measurements;
use crate::time_series::request::MeteoDataQuery;
use crate::types::station::Station;
use crate::utils::endpoint;
use log::info;
use polars::prelude::DataFrame;

/// Issues one measurements request for `stations` and builds the wide table.
pub(crate) fn fetch_ts_df(
    transport: &dyn HttpTransport,
    base_url: &str,
    query: &MeteoDataQuery,
    stations: &[Station],
    station_id_column: &str,
    time_name: &str,
) -> Result<DataFrame, TimeSeriesError> {
    if stations.is_empty() {
        return Err(TimeSeriesError::NoStations);
    }
    info!(
        "Requesting sensor {} ({}, {}) for {} stations from {} to {}",
        query.variable_code,
        query.scale,
        query.measurement,
        stations.len(),
        query.start_date.to_api_string(),
        query.end_date.to_api_string(),
    );
    let url = endpoint(base_url, METEO_DATA_ENDPOINT);
    let body = transport.get(&url, &query.query_pairs())?;
    let df = parse_measurements(&body, query, stations, station_id_column, time_name)?;
    info!("Loaded {} timestamps", df.height());
    Ok(df)
}
