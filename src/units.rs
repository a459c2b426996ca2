//! Unit conversion for emitted values.
//!
//! Tool paths carry lengths in millimetres and feed rates in millimetres per
//! minute. The output unit system decides what ends up in the program text.

use serde::Deserialize;
use std::fmt;

const MM_PER_INCH: f64 = 25.4;

/// Output unit system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Millimetres, G21
    #[default]
    Metric,
    /// Inches, G20
    Imperial,
}

impl UnitSystem {
    /// Convert a length in millimetres to this unit system
    pub fn length(self, value_mm: f64) -> f64 {
        match self {
            Self::Metric => value_mm,
            Self::Imperial => value_mm / MM_PER_INCH,
        }
    }

    /// Convert a velocity in mm/min to this unit system (per minute)
    pub fn velocity(self, value_mm_per_min: f64) -> f64 {
        match self {
            Self::Metric => value_mm_per_min,
            Self::Imperial => value_mm_per_min / MM_PER_INCH,
        }
    }

    pub fn length_label(self) -> &'static str {
        match self {
            Self::Metric => "mm",
            Self::Imperial => "in",
        }
    }

    pub fn velocity_label(self) -> &'static str {
        match self {
            Self::Metric => "mm/min",
            Self::Imperial => "in/min",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}
