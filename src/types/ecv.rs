//! WMO essential climate variables, used as provider-independent synonyms when
//! resolving a variable identifier.

use crate::settings::ECV_AGROMETEO_NAMES;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An essential climate variable name from the WMO GCOS controlled vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ecv {
    Precipitation,
    Pressure,
    SurfaceRadiationLongwave,
    SurfaceRadiationShortwave,
    SurfaceWindSpeed,
    SurfaceWindDirection,
    Temperature,
    WaterVapour,
}

impl Ecv {
    pub const ALL: [Ecv; 8] = [
        Ecv::Precipitation,
        Ecv::Pressure,
        Ecv::SurfaceRadiationLongwave,
        Ecv::SurfaceRadiationShortwave,
        Ecv::SurfaceWindSpeed,
        Ecv::SurfaceWindDirection,
        Ecv::Temperature,
        Ecv::WaterVapour,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ecv::Precipitation => "precipitation",
            Ecv::Pressure => "pressure",
            Ecv::SurfaceRadiationLongwave => "surface_radiation_longwave",
            Ecv::SurfaceRadiationShortwave => "surface_radiation_shortwave",
            Ecv::SurfaceWindSpeed => "surface_wind_speed",
            Ecv::SurfaceWindDirection => "surface_wind_direction",
            Ecv::Temperature => "temperature",
            Ecv::WaterVapour => "water_vapour",
        }
    }

    /// The Agrometeo sensor display name this ECV stands for, if the provider has one.
    pub fn agrometeo_name(&self) -> Option<&'static str> {
        ECV_AGROMETEO_NAMES
            .iter()
            .find(|(ecv, _)| ecv == self)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for Ecv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown essential climate variable '{0}'")]
pub struct UnknownEcv(pub String);

impl FromStr for Ecv {
    type Err = UnknownEcv;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ecv::ALL
            .into_iter()
            .find(|ecv| ecv.as_str() == s)
            .ok_or_else(|| UnknownEcv(s.to_string()))
    }
}
