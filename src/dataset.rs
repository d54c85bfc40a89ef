//! The provider-independent face of a meteorological station dataset.

use crate::region::Region;
use crate::settings::DEFAULT_STATION_ID_COLUMN;
use crate::time_series::error::TimeSeriesError;
use crate::time_series::geo_frame::TimeSeriesGeoFrame;
use crate::time_series::reshape::to_long_frame;
use crate::types::date_arg::DateArg;
use crate::types::scale::{Measurement, Scale};
use crate::types::variable_id::VariableId;
use bon::Builder;
use polars::prelude::DataFrame;

/// Everything needed to ask a dataset for one variable over a date range.
///
/// # Examples
///
/// ```
/// use agrometeo::{Measurement, Scale, TimeSeriesRequest, VariableId};
///
/// let request = TimeSeriesRequest::builder()
///     .variable("temperature")
///     .start_date("2022-03-22")
///     .end_date("2022-03-23")
///     .scale(Scale::Hour)
///     .measurement(Measurement::Max)
///     .build();
///
/// assert_eq!(request.variable, VariableId::Name("temperature".into()));
/// assert_eq!(request.station_id_column, None);
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct TimeSeriesRequest {
    /// Sensor code, sensor display name or ECV synonym.
    #[builder(into)]
    pub variable: VariableId,
    #[builder(into)]
    pub start_date: DateArg,
    #[builder(into)]
    pub end_date: DateArg,
    /// Defaults to [`Scale::None`], the native station resolution.
    pub scale: Option<Scale>,
    /// Defaults to [`Measurement::Avg`].
    pub measurement: Option<Measurement>,
    /// Station field used to label the station columns. Defaults to `"name"`.
    #[builder(into)]
    pub station_id_column: Option<String>,
}

impl TimeSeriesRequest {
    pub(crate) fn identifier_column(&self) -> &str {
        self.station_id_column
            .as_deref()
            .unwrap_or(DEFAULT_STATION_ID_COLUMN)
    }
}

/// A source of station time series restricted to a region.
///
/// Implementors provide the wide and geo tables; the long table is derived from the
/// wide one.
pub trait MeteoStationDataset {
    type Error: From<TimeSeriesError>;

    /// The area stations are restricted to, if one was resolved.
    fn region(&self) -> Option<&Region>;

    /// Name of the station identifier column in geo and long tables.
    fn station_id_name(&self) -> &str;

    /// Name of the timestamp column in wide and long tables.
    fn time_name(&self) -> &str;

    /// A time-indexed table with one column per station.
    fn ts_df(&self, request: &TimeSeriesRequest) -> Result<DataFrame, Self::Error>;

    /// A station-indexed table with one column per timestamp and a geometry per station.
    fn ts_gdf(&self, request: &TimeSeriesRequest) -> Result<TimeSeriesGeoFrame, Self::Error>;

    /// A long table with one `(time, station, value)` row per observation slot, ordered
    /// by station then time.
    fn ts_long_df(
        &self,
        request: &TimeSeriesRequest,
        value_name: &str,
    ) -> Result<DataFrame, Self::Error> {
        let df = self.ts_df(request)?;
        Ok(to_long_frame(
            &df,
            self.time_name(),
            self.station_id_name(),
            value_name,
        )?)
    }
}
