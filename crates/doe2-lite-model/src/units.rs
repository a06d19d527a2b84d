// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Length unit systems and distance string parsing

use crate::{Doe2Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length unit system of a host model
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Units {
    #[default]
    Meters,
    Millimeters,
    Feet,
    Inches,
    Centimeters,
}

impl Units {
    /// All unit systems, in abbreviation lookup order
    pub const ALL: [Units; 5] = [
        Units::Meters,
        Units::Millimeters,
        Units::Feet,
        Units::Inches,
        Units::Centimeters,
    ];

    /// Get the unit system name
    pub fn name(&self) -> &'static str {
        match self {
            Units::Meters => "Meters",
            Units::Millimeters => "Millimeters",
            Units::Feet => "Feet",
            Units::Inches => "Inches",
            Units::Centimeters => "Centimeters",
        }
    }

    /// Get the abbreviation used in distance strings
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Units::Meters => "m",
            Units::Millimeters => "mm",
            Units::Feet => "ft",
            Units::Inches => "in",
            Units::Centimeters => "cm",
        }
    }

    /// Length of one unit in meters
    pub fn to_meters(&self) -> f64 {
        match self {
            Units::Meters => scales::METRE,
            Units::Millimeters => scales::MILLIMETRE,
            Units::Feet => scales::FOOT,
            Units::Inches => scales::INCH,
            Units::Centimeters => scales::CENTIMETRE,
        }
    }

    /// Find the unit system for an abbreviation (e.g. "ft")
    pub fn from_abbreviation(abbr: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.abbreviation() == abbr)
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Units {
    type Err = Doe2Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|u| u.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Doe2Error::other(format!("Unknown unit system: {s}")))
    }
}

/// Convert a length from one unit system to another
pub fn convert_distance(value: f64, from: Units, to: Units) -> f64 {
    if from == to {
        return value;
    }
    value * from.to_meters() / to.to_meters()
}

/// Parse a distance string into a number in the destination units
///
/// The string is a number optionally followed by a unit abbreviation
/// (`m`, `mm`, `ft`, `in`, `cm`). A bare number is assumed to already be
/// in the destination units. Decimal commas are accepted.
///
/// ```ignore
/// let tol = parse_distance_string("0.03ft", Units::Meters)?;
/// assert!((tol - 0.009144).abs() < 1e-12);
/// ```
pub fn parse_distance_string(distance: &str, destination: Units) -> Result<f64> {
    let text = distance.trim().replace(',', ".");

    if let Ok(value) = text.parse::<f64>() {
        return Ok(value);
    }

    // Longest abbreviations first so "mm" is not read as "m"
    let mut by_length = Units::ALL;
    by_length.sort_by_key(|u| std::cmp::Reverse(u.abbreviation().len()));

    for units in by_length {
        if let Some(number) = text.strip_suffix(units.abbreviation()) {
            if let Ok(value) = number.trim_end().parse::<f64>() {
                return Ok(convert_distance(value, units, destination));
            }
        }
    }

    Err(Doe2Error::InvalidDistance(distance.to_string()))
}

/// Common unit scales (to meters)
pub mod scales {
    /// Meters to meters (identity)
    pub const METRE: f64 = 1.0;
    /// Millimeters to meters
    pub const MILLIMETRE: f64 = 0.001;
    /// Centimeters to meters
    pub const CENTIMETRE: f64 = 0.01;
    /// Inches to meters
    pub const INCH: f64 = 0.0254;
    /// Feet to meters
    pub const FOOT: f64 = 0.3048;
}
