//! Coordinate reference systems understood by the Agrometeo station endpoint, and the
//! reprojection between them.
//!
//! The stations payload carries every location twice: as WGS84 decimal degrees and as
//! Swiss LV03 grid coordinates. Reprojection between the two uses the swisstopo
//! approximate formulas, which are accurate to about one metre across Switzerland.

use geo::{Coord, MapCoords};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A coordinate reference system a [`crate::Region`] or a station location can be expressed in.
///
/// Coordinates are always stored `x` = east, `y` = north.
///
/// # Examples
///
/// ```
/// use agrometeo::Crs;
///
/// let crs: Crs = "EPSG:21781".parse().unwrap();
/// assert_eq!(crs, Crs::Lv03);
/// assert_eq!(Crs::default().to_string(), "epsg:4326");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Crs {
    /// WGS84 longitude/latitude in decimal degrees (EPSG:4326).
    #[default]
    Wgs84,
    /// Swiss legacy projected grid CH1903 / LV03 in metres (EPSG:21781).
    Lv03,
}

impl Crs {
    pub fn epsg(&self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::Lv03 => 21781,
        }
    }

    /// Names of the station payload fields holding the `(x, y)` coordinates in this CRS.
    pub(crate) fn geometry_columns(&self) -> (&'static str, &'static str) {
        match self {
            Crs::Wgs84 => ("long_dec", "lat_dec"),
            Crs::Lv03 => ("lon_ch", "lat_ch"),
        }
    }

    /// Converts a single coordinate from this CRS into `target`.
    pub fn transform_coord(&self, target: Crs, coord: Coord<f64>) -> Coord<f64> {
        match (self, target) {
            (Crs::Wgs84, Crs::Lv03) => wgs84_to_lv03(coord),
            (Crs::Lv03, Crs::Wgs84) => lv03_to_wgs84(coord),
            _ => coord,
        }
    }

    /// Reprojects any `geo` geometry from this CRS into `target`.
    pub fn transform<G>(&self, target: Crs, geometry: &G) -> G
    where
        G: MapCoords<f64, f64, Output = G>,
    {
        if *self == target {
            return geometry.map_coords(|c| c);
        }
        geometry.map_coords(|c| self.transform_coord(target, c))
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epsg:{}", self.epsg())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported coordinate reference system '{0}'")]
pub struct UnknownCrs(pub String);

impl FromStr for Crs {
    type Err = UnknownCrs;

    /// Accepts `epsg:4326`, `EPSG:21781`, bare codes, and OGC URNs such as
    /// `urn:ogc:def:crs:EPSG::21781`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let code = lowered
            .rsplit(|c: char| c == ':' || c == '/')
            .next()
            .unwrap_or_default();
        match code {
            "4326" | "crs84" => Ok(Crs::Wgs84),
            "21781" => Ok(Crs::Lv03),
            _ => Err(UnknownCrs(s.to_string())),
        }
    }
}

fn wgs84_to_lv03(coord: Coord<f64>) -> Coord<f64> {
    // auxiliary values in units of 10000"
    let phi = (coord.y * 3600.0 - 169_028.66) / 10_000.0;
    let lambda = (coord.x * 3600.0 - 26_782.5) / 10_000.0;

    let east = 600_072.37 + 211_455.93 * lambda
        - 10_938.51 * lambda * phi
        - 0.36 * lambda * phi.powi(2)
        - 44.54 * lambda.powi(3);
    let north = 200_147.07 + 308_807.95 * phi + 3_745.25 * lambda.powi(2) + 76.63 * phi.powi(2)
        - 194.56 * lambda.powi(2) * phi
        + 119.79 * phi.powi(3);

    Coord { x: east, y: north }
}

fn lv03_to_wgs84(coord: Coord<f64>) -> Coord<f64> {
    // auxiliary values in units of 1000 km
    let y = (coord.x - 600_000.0) / 1_000_000.0;
    let x = (coord.y - 200_000.0) / 1_000_000.0;

    let lambda = 2.677_909_4 + 4.728_982 * y + 0.791_484 * y * x + 0.130_6 * y * x.powi(2)
        - 0.043_6 * y.powi(3);
    let phi = 16.902_389_2 + 3.238_272 * x
        - 0.270_978 * y.powi(2)
        - 0.002_528 * x.powi(2)
        - 0.044_7 * y.powi(2) * x
        - 0.014_0 * x.powi(3);

    // from units of 10000" to degrees
    Coord {
        x: lambda * 100.0 / 36.0,
        y: phi * 100.0 / 36.0,
    }
}
