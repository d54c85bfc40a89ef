use plotters::style::RGBColor;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Continuous color scale used to color station markers and the legend bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Colormap {
    /// Diverging blue to red.
    #[default]
    Coolwarm,
    /// Perceptually uniform purple to yellow.
    Viridis,
    /// White to black.
    Greys,
    /// Diverging red, yellow, blue.
    RdYlBu,
}

const COOLWARM: [RGBColor; 5] = [
    RGBColor(59, 76, 192),
    RGBColor(141, 176, 254),
    RGBColor(221, 221, 221),
    RGBColor(244, 154, 123),
    RGBColor(180, 4, 38),
];

const VIRIDIS: [RGBColor; 5] = [
    RGBColor(68, 1, 84),
    RGBColor(59, 82, 139),
    RGBColor(33, 145, 140),
    RGBColor(94, 201, 98),
    RGBColor(253, 231, 37),
];

const GREYS: [RGBColor; 5] = [
    RGBColor(255, 255, 255),
    RGBColor(217, 217, 217),
    RGBColor(150, 150, 150),
    RGBColor(82, 82, 82),
    RGBColor(0, 0, 0),
];

const RD_YL_BU: [RGBColor; 5] = [
    RGBColor(165, 0, 38),
    RGBColor(244, 109, 67),
    RGBColor(255, 255, 191),
    RGBColor(116, 173, 209),
    RGBColor(49, 54, 149),
];

impl Colormap {
    pub const ALL: [Colormap; 4] = [
        Colormap::Coolwarm,
        Colormap::Viridis,
        Colormap::Greys,
        Colormap::RdYlBu,
    ];

    fn stops(&self) -> &'static [RGBColor] {
        match self {
            Colormap::Coolwarm => &COOLWARM,
            Colormap::Viridis => &VIRIDIS,
            Colormap::Greys => &GREYS,
            Colormap::RdYlBu => &RD_YL_BU,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Colormap::Coolwarm => "coolwarm",
            Colormap::Viridis => "viridis",
            Colormap::Greys => "Greys",
            Colormap::RdYlBu => "RdYlBu",
        }
    }

    /// The color at `t` in `[0, 1]`, interpolated linearly between the scale's stops.
    /// Values outside the range are clamped; NaN maps to the lowest color.
    ///
    /// ```
    /// use agrometeo::Colormap;
    /// use plotters::style::RGBColor;
    ///
    /// assert_eq!(Colormap::Greys.color(0.0), RGBColor(255, 255, 255));
    /// assert_eq!(Colormap::Greys.color(1.0), RGBColor(0, 0, 0));
    /// ```
    pub fn color(&self, t: f64) -> RGBColor {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let scaled = t * (stops.len() - 1) as f64;
        let lower = (scaled.floor() as usize).min(stops.len() - 2);
        let fraction = scaled - lower as f64;
        let (a, b) = (stops[lower], stops[lower + 1]);
        let mix = |from: u8, to: u8| -> u8 {
            (from as f64 + (to as f64 - from as f64) * fraction).round() as u8
        };
        RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown colormap name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown colormap '{0}'")]
pub struct UnknownColormap(pub String);

impl FromStr for Colormap {
    type Err = UnknownColormap;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Colormap::ALL
            .into_iter()
            .find(|cmap| cmap.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownColormap(s.to_string()))
    }
}
