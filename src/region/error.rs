use crate::http::error::HttpError;
use crate::types::crs::UnknownCrs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegionError {
    #[error("Failed to read region file '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to read region from reader")]
    Read(#[source] std::io::Error),

    #[error("Failed to parse GeoJSON region")]
    GeoJson(#[from] Box<geojson::Error>),

    #[error("Region declares an unsupported coordinate reference system")]
    UnsupportedCrs(#[from] UnknownCrs),

    #[error("Region contains no polygonal geometry")]
    NoPolygons,

    #[error("Invalid bounding box {0:?}, expected [west, south, east, north]")]
    InvalidBoundingBox([f64; 4]),

    #[error("No place found for query '{0}'")]
    PlaceNotFound(String),

    #[error("Failed to fetch region")]
    Http(#[from] HttpError),
}

impl From<geojson::Error> for RegionError {
    fn from(e: geojson::Error) -> Self {
        RegionError::GeoJson(Box::new(e))
    }
}
