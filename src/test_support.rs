//! Offline stand-ins for the Agrometeo API used across the unit tests.

use crate::http::error::HttpError;
use crate::http::HttpTransport;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

/// Serves canned bodies for URLs containing a given fragment and records every request.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTransport {
    routes: Vec<(String, String)>,
    requests: Rc<RefCell<Vec<RecordedRequest>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url_fragment: &str, body: &str) -> Self {
        self.routes.push((url_fragment.to_string(), body.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn requests_to(&self, url_fragment: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.url.contains(url_fragment))
            .count()
    }
}

impl HttpTransport for FakeTransport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String, HttpError> {
        self.requests.borrow_mut().push(RecordedRequest {
            url: url.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });
        let body = self
            .routes
            .iter()
            .find(|(fragment, _)| url.contains(fragment.as_str()))
            .map(|(_, body)| body.clone());
        match body {
            Some(body) => Ok(body),
            None => panic!("no fake route for {url}"),
        }
    }
}

/// Six stations around Lake Geneva. Pully, Epalinges and Lutry lie inside
/// [`LAUSANNE_BOX`]; Nyon and Sion lie outside; 60 has no coordinates at all.
pub(crate) const STATIONS_JSON: &str = r#"{"data": [
    {"id": 1, "name": "Pully", "long_dec": "6.6617", "lat_dec": "46.5106", "lon_ch": "540370", "lat_ch": "151329", "altitude": 461, "canton": "VD"},
    {"id": 9, "name": "Nyon", "long_dec": "6.2333", "lat_dec": "46.3833", "lon_ch": "507276", "lat_ch": "137595", "altitude": 390, "canton": "VD"},
    {"id": "27", "name": "Epalinges", "long_dec": 6.67, "lat_dec": 46.54, "lon_ch": 541040, "lat_ch": 154591, "altitude": 760, "canton": "VD"},
    {"id": 35, "name": "Lutry", "long_dec": "6.6890", "lat_dec": "46.5030", "lon_ch": "542458", "lat_ch": "150464", "altitude": 415, "canton": "VD"},
    {"id": 60, "name": "Broken", "long_dec": null, "lat_dec": "", "altitude": 500, "canton": "VD"},
    {"id": 103, "name": "Sion", "long_dec": "7.3600", "lat_dec": "46.2330", "lon_ch": "593933", "lat_ch": "120176", "altitude": 482, "canton": "VS"}
]}"#;

pub(crate) const SENSORS_JSON: &str = r#"{"data": [
    {"id": 1, "name": {"de": "Temperatur 2m über Boden", "fr": "Température 2m au-dessus du sol", "en": " Temperature 2m above ground ", "it": "Temperatura 2m dal suolo"}, "unit": "°C"},
    {"id": 3, "name": {"en": "Soil temperature -10cm"}, "unit": "°C"},
    {"id": 4, "name": {"en": "Relative humidity"}, "unit": "%"},
    {"id": 6, "name": {"en": "Precipitation"}, "unit": "mm"},
    {"id": 8, "name": {"en": "Wind direction"}, "unit": "°"},
    {"id": 9, "name": {"en": "Avg. wind speed"}, "unit": "m/s"},
    {"id": 11, "name": {"en": "Solar radiation"}, "unit": "W/m2"},
    {"id": 13, "name": "Dew point"},
    {"id": 18, "name": {"en": "Real air pressure"}, "unit": "hPa"},
    {"id": 36, "name": {"en": "Soil temperature -10cm"}, "unit": "°C"}
]}"#;

/// Temperature (code 1, avg) for Pully and Epalinges. Records arrive out of order, with
/// one repeated timestamp, mixed value encodings and a station outside the catalog.
/// Lutry reports nothing.
pub(crate) const MEASUREMENTS_JSON: &str = r#"{"data": [
    {"date": "2022-06-01 00:20:00", "1_1_avg": "14.2", "27_1_avg": 12.9, "999_1_avg": "1.0"},
    {"date": "2022-06-01T00:00:00", "1_1_avg": "14.6", "27_1_avg": "13.1", "999_1_avg": "1.0"},
    {"date": "2022-06-01 00:10:00", "1_1_avg": "-", "27_1_avg": null, "999_1_avg": "1.0"},
    {"date": "2022-06-01 00:20:00", "1_1_avg": "99.9", "27_1_avg": "99.9", "999_1_avg": "1.0"}
]}"#;

pub(crate) const LAUSANNE_BOX: [f64; 4] = [6.5, 46.4, 6.8, 46.6];

pub(crate) fn agrometeo_transport() -> FakeTransport {
    FakeTransport::new()
        .route("/stations", STATIONS_JSON)
        .route("/sensors", SENSORS_JSON)
        .route("/meteo/data", MEASUREMENTS_JSON)
}
