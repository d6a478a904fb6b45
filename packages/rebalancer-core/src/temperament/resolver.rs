//! Turning slider positions into concrete parameter values.

use super::mapping::{get_temperament_mapping, Temperament, TemperamentMapping};
use super::progression::adjusted_curve_value;
use crate::settings::SettingsSource;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Neutral slider position.
pub const NEUTRAL: f64 = 0.5;

/// Resolve a mapping against explicit slider values.
///
/// Fixed mappings return their base without consulting any slider. Every
/// other mapping is run through its progression curve and clamped to its
/// absolute bounds.
pub fn get_adjusted_value(
    mapping: &TemperamentMapping,
    risk_tolerance: f64,
    aggression: f64,
    patience: f64,
) -> f64 {
    let slider = match mapping.temperament {
        Temperament::Fixed => return mapping.base,
        Temperament::RiskTolerance => risk_tolerance,
        Temperament::Aggression => aggression,
        Temperament::Patience => patience,
    };

    let raw = adjusted_curve_value(
        mapping.progression,
        slider,
        mapping.min,
        mapping.base,
        mapping.max,
        mapping.inverse,
    );
    raw.clamp(mapping.absolute_min, mapping.absolute_max)
}

/// One consistent reading of the three temperament sliders.
///
/// Built once per planning cycle and passed to every parameter group so that
/// all groups reflect the same temperament.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SliderState {
    pub risk_tolerance: f64,
    pub aggression: f64,
    pub patience: f64,
}

impl Default for SliderState {
    fn default() -> Self {
        Self {
            risk_tolerance: NEUTRAL,
            aggression: NEUTRAL,
            patience: NEUTRAL,
        }
    }
}

impl SliderState {
    /// Create a slider state; values are clamped into [0, 1].
    pub fn new(risk_tolerance: f64, aggression: f64, patience: f64) -> Self {
        Self {
            risk_tolerance: sanitize(risk_tolerance),
            aggression: sanitize(aggression),
            patience: sanitize(patience),
        }
    }

    /// Read the persisted sliders, defaulting each missing one to neutral.
    pub fn load(settings: &dyn SettingsSource) -> Result<Self> {
        let read = |key: &str| -> Result<f64> { Ok(settings.get(key)?.unwrap_or(NEUTRAL)) };
        Ok(Self::new(
            read(Temperament::RiskTolerance.as_str())?,
            read(Temperament::Aggression.as_str())?,
            read(Temperament::Patience.as_str())?,
        ))
    }

    /// Current position of one slider (`Fixed` reads as neutral).
    pub fn slider(&self, temperament: Temperament) -> f64 {
        match temperament {
            Temperament::RiskTolerance => self.risk_tolerance,
            Temperament::Aggression => self.aggression,
            Temperament::Patience => self.patience,
            Temperament::Fixed => NEUTRAL,
        }
    }

    /// Resolve a mapping with this snapshot.
    pub fn adjusted_value(&self, mapping: &TemperamentMapping) -> f64 {
        get_adjusted_value(mapping, self.risk_tolerance, self.aggression, self.patience)
    }

    /// Resolve a parameter by name.
    pub fn resolve(&self, parameter: &str) -> Result<f64> {
        get_temperament_mapping(parameter)
            .map(|mapping| self.adjusted_value(mapping))
            .ok_or_else(|| Error::UnknownMapping(parameter.to_string()))
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        NEUTRAL
    }
}
