//! Measurement types and material kinds for sediment stocks.
//!
//! - [`Measurement`] declares how a stock amount is expressed (grams or
//!   centimetres of column height).
//! - [`Material`] selects the bulk density used to convert between the two.
//!
//! Notes
//! -----
//! - Both enums are metadata only; conversions live on
//!   [`ParameterBundle`](crate::accretion::core::params::ParameterBundle).
use serde::{Deserialize, Serialize};

/// Unit in which a stock amount or a flow is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Measurement {
    /// Mass in grams.
    Weight,
    /// Height of column occupied, in centimetres.
    #[default]
    Length,
}

impl Measurement {
    /// Parse a case-insensitive name (`"weight"` / `"length"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "weight" => Some(Measurement::Weight),
            "length" => Some(Measurement::Length),
            _ => None,
        }
    }
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Measurement::Weight => write!(f, "weight"),
            Measurement::Length => write!(f, "length"),
        }
    }
}

/// Material class of a stock; picks the bulk density for conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    /// Live roots, labile and refractory organic matter.
    Organic,
    /// Mineral sediment and ash.
    Inorganic,
}
