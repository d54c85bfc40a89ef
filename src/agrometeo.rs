//! The Agrometeo dataset: the main entry point of the crate.

use crate::catalog::stations::{fetch_stations, filter_stations};
use crate::catalog::variables::{fetch_variables, resolve_variable};
use crate::dataset::{MeteoStationDataset, TimeSeriesRequest};
use crate::error::AgrometeoError;
use crate::http::{HttpTransport, ReqwestTransport};
use crate::region::geocode::Geocoder;
use crate::region::{resolve_region, Region, RegionInput};
use crate::settings::{BASE_URL, STATION_ID_NAME, TIME_NAME, VALUE_NAME};
use crate::time_series::fetch_ts_df;
use crate::time_series::geo_frame::TimeSeriesGeoFrame;
use crate::time_series::request::MeteoDataQuery;
use crate::time_series::reshape::to_geo_frame;
use crate::types::crs::Crs;
use crate::types::date_arg::DateArg;
use crate::types::predicate::SpatialPredicate;
use crate::types::scale::{Measurement, Scale};
use crate::types::station::Station;
use crate::types::variable::Variable;
use crate::types::variable_id::VariableId;
use bon::bon;
use log::info;
use polars::prelude::DataFrame;
use std::cell::OnceCell;

/// Meteorological stations of the Agrometeo network (Agroscope), restricted to a region.
///
/// The region is resolved once when the dataset is built. The station and sensor
/// catalogs are fetched on first use and kept for the lifetime of the dataset; every
/// time-series call issues a fresh measurements request.
///
/// # Examples
///
/// ```no_run
/// use agrometeo::{AgrometeoDataset, AgrometeoError};
///
/// # fn main() -> Result<(), AgrometeoError> {
/// let dataset = AgrometeoDataset::builder()
///     .region("Pully, Switzerland")
///     .build()?;
///
/// let ts_df = dataset
///     .get_ts_df()
///     .variable("temperature")
///     .start_date("2022-03-22")
///     .end_date("2022-03-23")
///     .call()?;
/// println!("{ts_df}");
/// # Ok(())
/// # }
/// ```
pub struct AgrometeoDataset {
    region: Option<Region>,
    crs: Crs,
    predicate: SpatialPredicate,
    station_id_name: String,
    time_name: String,
    base_url: String,
    transport: Box<dyn HttpTransport>,
    stations: OnceCell<Vec<Station>>,
    variables: OnceCell<Vec<Variable>>,
}

#[bon]
impl AgrometeoDataset {
    /// Builds a dataset, resolving the region immediately.
    ///
    /// # Arguments
    ///
    /// * `region` - The area of interest. Without one, every station is used.
    /// * `crs` - CRS of station locations and geo tables. Defaults to WGS84.
    /// * `predicate` - How stations relate to the region. Defaults to `Within`.
    /// * `station_id_name` - Identifier column name of geo and long tables.
    /// * `time_name` - Timestamp column name of wide and long tables.
    /// * `base_url` - Root of the Agrometeo API.
    /// * `transport` - HTTP transport. Defaults to a blocking `reqwest` client.
    /// * `geocoder` - Resolves place-name regions. Defaults to Nominatim when the
    ///   `nominatim` feature is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`AgrometeoError::Region`] if the region cannot be resolved and
    /// [`AgrometeoError::Http`] if the default HTTP client cannot be created.
    #[builder]
    pub fn new(
        #[builder(into)] region: Option<RegionInput>,
        #[builder(default)] crs: Crs,
        #[builder(default)] predicate: SpatialPredicate,
        #[builder(into, default = STATION_ID_NAME.to_string())] station_id_name: String,
        #[builder(into, default = TIME_NAME.to_string())] time_name: String,
        #[builder(into, default = BASE_URL.to_string())] base_url: String,
        transport: Option<Box<dyn HttpTransport>>,
        geocoder: Option<Box<dyn Geocoder>>,
    ) -> Result<Self, AgrometeoError> {
        let transport = match transport {
            Some(transport) => transport,
            None => Box::new(ReqwestTransport::new()?),
        };
        let region = match region {
            Some(input) => {
                let geocoder = match geocoder {
                    Some(geocoder) => Some(geocoder),
                    None => default_geocoder(&input)?,
                };
                resolve_region(input, transport.as_ref(), geocoder.as_deref())?
            }
            None => None,
        };

        Ok(Self {
            region,
            crs,
            predicate,
            station_id_name,
            time_name,
            base_url,
            transport,
            stations: OnceCell::new(),
            variables: OnceCell::new(),
        })
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn predicate(&self) -> SpatialPredicate {
        self.predicate
    }

    /// The stations satisfying the spatial predicate against the region, in catalog order.
    ///
    /// Fetched on first call, then served from memory.
    pub fn stations(&self) -> Result<&[Station], AgrometeoError> {
        if let Some(stations) = self.stations.get() {
            return Ok(stations.as_slice());
        }
        let stations = fetch_stations(self.transport.as_ref(), &self.base_url, self.crs)?;
        let stations = filter_stations(stations, self.region.as_ref(), self.crs, self.predicate);
        Ok(self.stations.get_or_init(|| stations).as_slice())
    }

    /// Every sensor the API knows about. Fetched on first call, then served from memory.
    pub fn variables(&self) -> Result<&[Variable], AgrometeoError> {
        if let Some(variables) = self.variables.get() {
            return Ok(variables.as_slice());
        }
        let variables = fetch_variables(self.transport.as_ref(), &self.base_url)?;
        Ok(self.variables.get_or_init(|| variables).as_slice())
    }

    /// Resolves a sensor code, display name or ECV synonym to a sensor code.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidVariable`](crate::CatalogError::InvalidVariable)
    /// unless exactly one sensor matches.
    pub fn resolve_variable(
        &self,
        variable: impl Into<VariableId>,
    ) -> Result<u32, AgrometeoError> {
        let variable = variable.into();
        let code = resolve_variable(self.variables()?, &variable)?;
        info!("Resolved variable {} to sensor {}", variable, code);
        Ok(code)
    }

    /// Fetches a time-indexed table with one column per station.
    ///
    /// Required: `variable`, `start_date`, `end_date`. Optional: `scale` (default
    /// [`Scale::None`]), `measurement` (default [`Measurement::Avg`]) and
    /// `station_id_column` (default `"name"`), the station field that labels columns.
    #[builder]
    pub fn get_ts_df(
        &self,
        #[builder(into)] variable: VariableId,
        #[builder(into)] start_date: DateArg,
        #[builder(into)] end_date: DateArg,
        scale: Option<Scale>,
        measurement: Option<Measurement>,
        #[builder(into)] station_id_column: Option<String>,
    ) -> Result<DataFrame, AgrometeoError> {
        self.ts_df(&TimeSeriesRequest {
            variable,
            start_date,
            end_date,
            scale,
            measurement,
            station_id_column,
        })
    }

    /// Fetches a station-indexed table with one column per timestamp and a geometry per
    /// station. Takes the same arguments as [`AgrometeoDataset::get_ts_df`].
    #[builder]
    pub fn get_ts_gdf(
        &self,
        #[builder(into)] variable: VariableId,
        #[builder(into)] start_date: DateArg,
        #[builder(into)] end_date: DateArg,
        scale: Option<Scale>,
        measurement: Option<Measurement>,
        #[builder(into)] station_id_column: Option<String>,
    ) -> Result<TimeSeriesGeoFrame, AgrometeoError> {
        self.ts_gdf(&TimeSeriesRequest {
            variable,
            start_date,
            end_date,
            scale,
            measurement,
            station_id_column,
        })
    }

    /// Fetches a long table of `(time, station, value)` rows. Takes the same arguments as
    /// [`AgrometeoDataset::get_ts_df`] plus `value_name` (default `"value"`).
    #[builder]
    pub fn get_ts_long_df(
        &self,
        #[builder(into)] variable: VariableId,
        #[builder(into)] start_date: DateArg,
        #[builder(into)] end_date: DateArg,
        scale: Option<Scale>,
        measurement: Option<Measurement>,
        #[builder(into)] station_id_column: Option<String>,
        #[builder(into, default = VALUE_NAME.to_string())] value_name: String,
    ) -> Result<DataFrame, AgrometeoError> {
        let request = TimeSeriesRequest {
            variable,
            start_date,
            end_date,
            scale,
            measurement,
            station_id_column,
        };
        self.ts_long_df(&request, &value_name)
    }
}

impl MeteoStationDataset for AgrometeoDataset {
    type Error = AgrometeoError;

    fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    fn station_id_name(&self) -> &str {
        &self.station_id_name
    }

    fn time_name(&self) -> &str {
        &self.time_name
    }

    fn ts_df(&self, request: &TimeSeriesRequest) -> Result<DataFrame, AgrometeoError> {
        let code = self.resolve_variable(request.variable.clone())?;
        let stations = self.stations()?;
        let query = MeteoDataQuery::new(
            request.start_date.clone(),
            request.end_date.clone(),
            request.scale,
            request.measurement,
            code,
            stations,
        );
        Ok(fetch_ts_df(
            self.transport.as_ref(),
            &self.base_url,
            &query,
            stations,
            request.identifier_column(),
            &self.time_name,
        )?)
    }

    fn ts_gdf(&self, request: &TimeSeriesRequest) -> Result<TimeSeriesGeoFrame, AgrometeoError> {
        let df = self.ts_df(request)?;
        Ok(to_geo_frame(
            &df,
            self.stations()?,
            request.identifier_column(),
            &self.time_name,
            &self.station_id_name,
            self.crs,
        )?)
    }
}

#[cfg(feature = "nominatim")]
fn default_geocoder(input: &RegionInput) -> Result<Option<Box<dyn Geocoder>>, AgrometeoError> {
    use crate::region::geocode::NominatimGeocoder;

    match input {
        RegionInput::PlaceName(_) => Ok(Some(Box::new(NominatimGeocoder::new()?))),
        _ => Ok(None),
    }
}

#[cfg(not(feature = "nominatim"))]
fn default_geocoder(_input: &RegionInput) -> Result<Option<Box<dyn Geocoder>>, AgrometeoError> {
    Ok(None)
}
