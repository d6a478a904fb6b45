//! Temperament mapping definitions and the immutable registry.

use super::progression::Progression;
use super::table::MAPPINGS;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Slider that controls a parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Temperament {
    RiskTolerance,
    Aggression,
    Patience,
    /// Slider-independent; always resolves to the base value
    Fixed,
}

impl Temperament {
    pub fn as_str(&self) -> &'static str {
        match self {
            Temperament::RiskTolerance => "risk_tolerance",
            Temperament::Aggression => "aggression",
            Temperament::Patience => "patience",
            Temperament::Fixed => "fixed",
        }
    }
}

impl fmt::Display for Temperament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How one named parameter responds to its controlling slider.
///
/// `min` and `max` are the soft band reached at the slider extremes, `base`
/// is the neutral value at 0.5, and `absolute_min`/`absolute_max` are hard
/// bounds no slider combination may cross.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TemperamentMapping {
    pub parameter: &'static str,
    pub temperament: Temperament,
    pub inverse: bool,
    pub min: f64,
    pub max: f64,
    pub base: f64,
    pub progression: Progression,
    pub absolute_min: f64,
    pub absolute_max: f64,
}

impl TemperamentMapping {
    /// A parameter that grows with its slider.
    pub const fn direct(
        parameter: &'static str,
        temperament: Temperament,
        progression: Progression,
    ) -> Self {
        Self {
            parameter,
            temperament,
            inverse: false,
            min: 0.0,
            max: 0.0,
            base: 0.0,
            progression,
            absolute_min: 0.0,
            absolute_max: 0.0,
        }
    }

    /// A parameter that shrinks as its slider grows.
    pub const fn inverse(
        parameter: &'static str,
        temperament: Temperament,
        progression: Progression,
    ) -> Self {
        let mut mapping = Self::direct(parameter, temperament, progression);
        mapping.inverse = true;
        mapping
    }

    /// A slider-independent parameter pinned to `base`.
    pub const fn fixed(parameter: &'static str, base: f64) -> Self {
        let mut mapping = Self::direct(parameter, Temperament::Fixed, Progression::Linear);
        mapping.min = base;
        mapping.base = base;
        mapping.max = base;
        mapping
    }

    /// Set the soft band and neutral value.
    pub const fn band(mut self, min: f64, base: f64, max: f64) -> Self {
        self.min = min;
        self.base = base;
        self.max = max;
        self
    }

    /// Set the hard bounds.
    pub const fn hard(mut self, absolute_min: f64, absolute_max: f64) -> Self {
        self.absolute_min = absolute_min;
        self.absolute_max = absolute_max;
        self
    }

    pub fn is_fixed(&self) -> bool {
        self.temperament == Temperament::Fixed
    }

    /// Check `absolute_min ≤ min ≤ base ≤ max ≤ absolute_max`.
    pub fn validate(&self) -> Result<()> {
        let values = [self.min, self.max, self.base, self.absolute_min, self.absolute_max];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(self.invalid("non-finite bound"));
        }
        if self.absolute_min > self.min {
            return Err(self.invalid(format!(
                "absolute_min {} above min {}",
                self.absolute_min, self.min
            )));
        }
        if self.max > self.absolute_max {
            return Err(self.invalid(format!(
                "max {} above absolute_max {}",
                self.max, self.absolute_max
            )));
        }
        if self.base < self.min || self.base > self.max {
            return Err(self.invalid(format!(
                "base {} outside band [{}, {}]",
                self.base, self.min, self.max
            )));
        }
        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> Error {
        Error::InvalidMapping {
            parameter: self.parameter.to_string(),
            reason: reason.into(),
        }
    }
}

static REGISTRY: LazyLock<HashMap<&'static str, &'static TemperamentMapping>> =
    LazyLock::new(|| MAPPINGS.iter().map(|m| (m.parameter, m)).collect());

/// Look up a mapping by parameter name.
pub fn get_temperament_mapping(name: &str) -> Option<&'static TemperamentMapping> {
    REGISTRY.get(name).copied()
}

/// Every registered mapping, in declaration order.
pub fn all_mappings() -> &'static [TemperamentMapping] {
    MAPPINGS
}

/// Mappings driven by one slider.
pub fn mappings_for(temperament: Temperament) -> impl Iterator<Item = &'static TemperamentMapping> {
    MAPPINGS.iter().filter(move |m| m.temperament == temperament)
}

/// Validate every mapping and reject duplicate parameter names.
pub fn validate_registry() -> Result<()> {
    for mapping in MAPPINGS {
        mapping.validate()?;
    }
    if REGISTRY.len() != MAPPINGS.len() {
        let mut seen = std::collections::HashSet::new();
        let duplicate = MAPPINGS
            .iter()
            .find(|m| !seen.insert(m.parameter))
            .map(|m| m.parameter)
            .unwrap_or("<unknown>");
        return Err(Error::InvalidMapping {
            parameter: duplicate.to_string(),
            reason: "registered more than once".to_string(),
        });
    }
    Ok(())
}
