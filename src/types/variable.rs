//! Measured variables ("sensors" in Agrometeo terms).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DISPLAY_LANGUAGE: &str = "en";

/// A sensor name, either a plain string or a map of language code to translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedName {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

impl LocalizedName {
    /// The English name, falling back to the first available translation.
    pub fn display(&self) -> &str {
        match self {
            LocalizedName::Plain(name) => name,
            LocalizedName::Localized(names) => names
                .get(DISPLAY_LANGUAGE)
                .or_else(|| names.values().next())
                .map(String::as_str)
                .unwrap_or_default(),
        }
    }

    pub fn get(&self, language: &str) -> Option<&str> {
        match self {
            LocalizedName::Plain(name) => Some(name),
            LocalizedName::Localized(names) => names.get(language).map(String::as_str),
        }
    }
}

/// A variable that can be requested from the measurements endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// The code used in the `sensors={code}:{measurement}` selector.
    pub code: u32,
    /// The English display name, whitespace-trimmed. This is what names resolve against.
    pub name: String,
    /// All translations as delivered by the API.
    pub names: LocalizedName,
    /// Unit of measurement, if the API reports one.
    pub unit: Option<String>,
}
