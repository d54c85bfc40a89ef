//! Normalizing the many ways a caller can describe an area of interest into a single
//! [`Region`].

pub mod error;
pub mod geocode;
mod geojson_source;

use crate::http::HttpTransport;
use crate::region::error::RegionError;
use crate::region::geocode::Geocoder;
use crate::types::crs::Crs;
use geo::{BoundingRect, Coord, Geometry, MultiPolygon, Polygon, Rect};
use log::{info, warn};
use std::io::Read;
use std::path::{Path, PathBuf};

/// An area of interest, as supplied by the caller.
///
/// Each variant is resolved differently by [`AgrometeoDataset`](crate::AgrometeoDataset)
/// at construction time. `From` conversions pick the obvious variant:
///
/// ```
/// use agrometeo::RegionInput;
/// use std::path::PathBuf;
///
/// assert!(matches!(RegionInput::from("Pully, Switzerland"), RegionInput::PlaceName(_)));
/// assert!(matches!(RegionInput::from([6.5, 46.4, 6.8, 46.6]), RegionInput::BoundingBox(_)));
/// assert!(matches!(RegionInput::from(PathBuf::from("vaud.geojson")), RegionInput::File(_)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RegionInput {
    /// Geometries already in memory, taken as-is in the given CRS.
    Geometries {
        geometries: Vec<Geometry<f64>>,
        crs: Crs,
    },
    /// `[west, south, east, north]` in WGS84 degrees.
    BoundingBox([f64; 4]),
    /// Path to a GeoJSON file.
    File(PathBuf),
    /// URL of a GeoJSON document, fetched with the dataset transport.
    Url(String),
    /// An in-memory GeoJSON document.
    GeoJson(String),
    /// Free-text place name, resolved with the dataset's geocoder.
    PlaceName(String),
}

impl RegionInput {
    /// Reads a GeoJSON document from an open reader, e.g. a file opened by the caller.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, RegionError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(RegionError::Read)?;
        Ok(RegionInput::GeoJson(text))
    }

    pub fn url(url: impl Into<String>) -> Self {
        RegionInput::Url(url.into())
    }
}

impl From<&str> for RegionInput {
    fn from(place: &str) -> Self {
        RegionInput::PlaceName(place.to_string())
    }
}

impl From<String> for RegionInput {
    fn from(place: String) -> Self {
        RegionInput::PlaceName(place)
    }
}

impl From<[f64; 4]> for RegionInput {
    fn from(bounds: [f64; 4]) -> Self {
        RegionInput::BoundingBox(bounds)
    }
}

impl From<PathBuf> for RegionInput {
    fn from(path: PathBuf) -> Self {
        RegionInput::File(path)
    }
}

impl From<&Path> for RegionInput {
    fn from(path: &Path) -> Self {
        RegionInput::File(path.to_path_buf())
    }
}

impl From<Polygon<f64>> for RegionInput {
    fn from(polygon: Polygon<f64>) -> Self {
        RegionInput::Geometries {
            geometries: vec![Geometry::Polygon(polygon)],
            crs: Crs::Wgs84,
        }
    }
}

impl From<MultiPolygon<f64>> for RegionInput {
    fn from(polygons: MultiPolygon<f64>) -> Self {
        RegionInput::Geometries {
            geometries: vec![Geometry::MultiPolygon(polygons)],
            crs: Crs::Wgs84,
        }
    }
}

/// A resolved area of interest: one multipolygon with a known CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    geometry: MultiPolygon<f64>,
    crs: Crs,
}

impl Region {
    pub fn new(geometry: MultiPolygon<f64>, crs: Crs) -> Self {
        Self { geometry, crs }
    }

    /// Merges the areal members of `geometries` into one region. Points and lines
    /// cannot contain stations and are dropped with a warning.
    pub fn from_geometries(geometries: Vec<Geometry<f64>>, crs: Crs) -> Result<Self, RegionError> {
        let mut polygons = Vec::new();
        let mut dropped = 0usize;
        collect_polygons(geometries, &mut polygons, &mut dropped);

        if dropped > 0 {
            warn!("Ignoring {} non-polygonal geometries in region", dropped);
        }
        if polygons.is_empty() {
            return Err(RegionError::NoPolygons);
        }
        Ok(Self::new(MultiPolygon(polygons), crs))
    }

    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    /// The same region expressed in `crs`.
    pub fn to_crs(&self, crs: Crs) -> Region {
        Region {
            geometry: self.crs.transform(crs, &self.geometry),
            crs,
        }
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.geometry.bounding_rect()
    }
}

fn collect_polygons(geometries: Vec<Geometry<f64>>, out: &mut Vec<Polygon<f64>>, dropped: &mut usize) {
    for geometry in geometries {
        match geometry {
            Geometry::Polygon(p) => out.push(p),
            Geometry::MultiPolygon(mp) => out.extend(mp.0),
            Geometry::Rect(r) => out.push(r.to_polygon()),
            Geometry::Triangle(t) => out.push(t.to_polygon()),
            Geometry::GeometryCollection(gc) => collect_polygons(gc.0, out, dropped),
            _ => *dropped += 1,
        }
    }
}

/// Resolves `input` into a [`Region`].
///
/// Place names need a geocoder. Without one this warns and returns `Ok(None)`: the
/// dataset then works without a spatial constraint.
pub(crate) fn resolve_region(
    input: RegionInput,
    transport: &dyn HttpTransport,
    geocoder: Option<&dyn Geocoder>,
) -> Result<Option<Region>, RegionError> {
    let region = match input {
        RegionInput::Geometries { geometries, crs } => Region::from_geometries(geometries, crs)?,
        RegionInput::BoundingBox(bounds) => bounding_box_region(bounds)?,
        RegionInput::File(path) => {
            let text = std::fs::read_to_string(&path).map_err(|e| RegionError::Io(path.clone(), e))?;
            geojson_source::parse_region(&text)?
        }
        RegionInput::Url(url) => {
            let text = transport.get(&url, &[])?;
            geojson_source::parse_region(&text)?
        }
        RegionInput::GeoJson(text) => geojson_source::parse_region(&text)?,
        RegionInput::PlaceName(query) => {
            let Some(geocoder) = geocoder else {
                warn!(
                    "Resolving the place name '{}' as a region requires a geocoder. \
                     Enable the `nominatim` feature or pass one to the dataset builder. \
                     Continuing without a region.",
                    query
                );
                return Ok(None);
            };
            geocoder
                .geocode(&query)?
                .ok_or(RegionError::PlaceNotFound(query))?
        }
    };

    info!(
        "Resolved region with {} polygon(s) in {}",
        region.geometry.0.len(),
        region.crs
    );
    Ok(Some(region))
}

fn bounding_box_region(bounds: [f64; 4]) -> Result<Region, RegionError> {
    let [west, south, east, north] = bounds;
    if !bounds.iter().all(|v| v.is_finite()) || west >= east || south >= north {
        return Err(RegionError::InvalidBoundingBox(bounds));
    }
    let rect = Rect::new(Coord { x: west, y: south }, Coord { x: east, y: north });
    Ok(Region::new(MultiPolygon(vec![rect.to_polygon()]), Crs::Wgs84))
}
