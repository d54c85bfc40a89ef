use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// A query boundary date: either a calendar date, formatted as `YYYY-MM-DD` for the
/// API, or a string forwarded to the API untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateArg {
    Date(NaiveDate),
    Text(String),
}

impl DateArg {
    pub fn to_api_string(&self) -> String {
        match self {
            DateArg::Date(date) => date.format(API_DATE_FORMAT).to_string(),
            DateArg::Text(text) => text.clone(),
        }
    }
}

impl From<NaiveDate> for DateArg {
    fn from(date: NaiveDate) -> Self {
        DateArg::Date(date)
    }
}

impl From<NaiveDateTime> for DateArg {
    fn from(datetime: NaiveDateTime) -> Self {
        DateArg::Date(datetime.date())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateArg {
    fn from(datetime: DateTime<Tz>) -> Self {
        DateArg::Date(datetime.date_naive())
    }
}

impl From<&str> for DateArg {
    fn from(text: &str) -> Self {
        DateArg::Text(text.to_string())
    }
}

impl From<String> for DateArg {
    fn from(text: String) -> Self {
        DateArg::Text(text)
    }
}
