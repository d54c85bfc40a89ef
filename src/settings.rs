//! Default values for dataset construction, queries and plotting.

use crate::types::ecv::Ecv;

// core
pub const BASE_URL: &str = "https://www.agrometeo.ch/backend/api";
pub const STATIONS_ENDPOINT: &str = "stations";
pub const SENSORS_ENDPOINT: &str = "sensors";
pub const METEO_DATA_ENDPOINT: &str = "meteo/data";
pub const STATION_ID_NAME: &str = "station_id";
pub const TIME_NAME: &str = "time";
pub const VALUE_NAME: &str = "value";
pub const GEOMETRY_NAME: &str = "geometry";

// agrometeo specific
pub const DEFAULT_STATION_ID_COLUMN: &str = "name";
pub const RESPONSE_DATE_FIELD: &str = "date";

// geocoding
pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

// plotting
pub const PLOT_LEGEND: bool = true;
pub const PLOT_LEGEND_SIZE: f64 = 0.025;
pub const PLOT_LEGEND_PAD: f64 = 0.02;
pub const PLOT_ADD_BASEMAP: bool = true;
pub const PLOT_SIZE: (u32, u32) = (800, 600);
pub const PLOT_MARKER_RADIUS: i32 = 6;

/// https://public.wmo.int/en/programmes/global-climate-observing-system/essential-climate-variables
pub const ECV_AGROMETEO_NAMES: &[(Ecv, &str)] = &[
    (Ecv::Precipitation, "Precipitation"),
    (Ecv::Pressure, "Real air pressure"),
    (Ecv::SurfaceRadiationShortwave, "Solar radiation"),
    (Ecv::SurfaceWindSpeed, "Avg. wind speed"),
    (Ecv::SurfaceWindDirection, "Wind direction"),
    (Ecv::Temperature, "Temperature 2m above ground"),
    (Ecv::WaterVapour, "Relative humidity"),
];
