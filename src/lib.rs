mod agrometeo;
mod catalog;
mod dataset;
mod error;
mod http;
mod plotting;
mod region;
pub mod settings;
mod time_series;
mod types;
mod utils;

#[cfg(test)]
mod test_support;

pub use agrometeo::AgrometeoDataset;
pub use dataset::{MeteoStationDataset, TimeSeriesRequest};
pub use error::AgrometeoError;

pub use http::{HttpTransport, ReqwestTransport};
pub use region::geocode::Geocoder;
#[cfg(feature = "nominatim")]
pub use region::geocode::NominatimGeocoder;
pub use region::{Region, RegionInput};

pub use time_series::geo_frame::TimeSeriesGeoFrame;

pub use plotting::basemap::{Basemap, BasemapTile};
pub use plotting::colormap::{Colormap, UnknownColormap};
pub use plotting::{plot_map, LegendPosition, Title};

pub use types::crs::{Crs, UnknownCrs};
pub use types::date_arg::DateArg;
pub use types::ecv::{Ecv, UnknownEcv};
pub use types::predicate::SpatialPredicate;
pub use types::scale::{Measurement, Scale};
pub use types::station::Station;
pub use types::variable::{LocalizedName, Variable};
pub use types::variable_id::VariableId;

pub use catalog::error::CatalogError;
pub use http::error::HttpError;
pub use plotting::error::PlotError;
pub use region::error::RegionError;
pub use time_series::error::TimeSeriesError;
