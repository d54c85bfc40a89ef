//! Temporal aggregation scale and statistic of a measurements query.

use std::fmt;

/// Temporal granularity requested from the measurements endpoint.
///
/// # Examples
///
/// ```
/// use agrometeo::Scale;
///
/// assert_eq!(Scale::default().to_string(), "none");
/// assert_eq!(Scale::Day.to_string(), "day");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scale {
    /// Native station resolution (10 minutes). The statistic is ignored by the API.
    #[default]
    None,
    Hour,
    Day,
    Month,
    Year,
}

impl Scale {
    pub(crate) fn query_value(&self) -> &'static str {
        match self {
            Scale::None => "none",
            Scale::Hour => "hour",
            Scale::Day => "day",
            Scale::Month => "month",
            Scale::Year => "year",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_value())
    }
}

/// Statistic applied within each aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Measurement {
    Min,
    #[default]
    Avg,
    Max,
}

impl Measurement {
    pub(crate) fn query_value(&self) -> &'static str {
        match self {
            Measurement::Min => "min",
            Measurement::Avg => "avg",
            Measurement::Max => "max",
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_value())
    }
}
