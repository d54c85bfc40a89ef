//! Free-text place geocoding.

use crate::region::error::RegionError;
use crate::region::Region;

/// Resolves a place name (e.g. "Pully, Switzerland") to its outline.
///
/// Returns `Ok(None)` when the service knows no such place.
pub trait Geocoder {
    fn geocode(&self, query: &str) -> Result<Option<Region>, RegionError>;
}

#[cfg(feature = "nominatim")]
pub use nominatim::NominatimGeocoder;

#[cfg(feature = "nominatim")]
mod nominatim {
    use super::Geocoder;
    use crate::http::error::HttpError;
    use crate::http::{HttpTransport, ReqwestTransport};
    use crate::region::error::RegionError;
    use crate::region::Region;
    use crate::settings::NOMINATIM_URL;
    use crate::types::crs::Crs;
    use geojson::{FeatureCollection, GeoJson};
    use log::info;

    /// [`Geocoder`] backed by the OpenStreetMap Nominatim search API.
    ///
    /// Only the first (best ranked) match is used, and it must have a polygonal outline.
    pub struct NominatimGeocoder {
        transport: Box<dyn HttpTransport>,
        url: String,
    }

    impl NominatimGeocoder {
        pub fn new() -> Result<Self, HttpError> {
            Ok(Self::with_transport(Box::new(ReqwestTransport::new()?)))
        }

        pub fn with_transport(transport: Box<dyn HttpTransport>) -> Self {
            Self {
                transport,
                url: NOMINATIM_URL.to_string(),
            }
        }

        /// Points the geocoder at another Nominatim instance.
        pub fn with_url(mut self, url: impl Into<String>) -> Self {
            self.url = url.into();
            self
        }
    }

    impl Geocoder for NominatimGeocoder {
        fn geocode(&self, query: &str) -> Result<Option<Region>, RegionError> {
            let body = self.transport.get(
                &self.url,
                &[
                    ("q", query.to_string()),
                    ("format", "geojson".to_string()),
                    ("polygon_geojson", "1".to_string()),
                    ("limit", "1".to_string()),
                ],
            )?;
            let document: GeoJson = body.parse()?;
            let collection = FeatureCollection::try_from(document)?;

            let Some(geometry) = collection
                .features
                .into_iter()
                .find_map(|feature| feature.geometry)
            else {
                return Ok(None);
            };
            info!("Geocoded '{}'", query);

            let geometry = geo::Geometry::<f64>::try_from(geometry)?;
            Region::from_geometries(vec![geometry], Crs::Wgs84).map(Some)
        }
    }

}
