//! Temperament sliders and their mapping onto trading parameters.
//!
//! Three sliders (risk tolerance, aggression, patience) drive every
//! tunable parameter through a progression curve anchored at the slider
//! extremes and at the neutral 0.5 position.

mod mapping;
mod progression;
mod resolver;
mod table;

pub use mapping::{
    all_mappings, get_temperament_mapping, mappings_for, validate_registry, Temperament,
    TemperamentMapping,
};
pub use progression::{adjusted_curve_value, Progression};
pub use resolver::{get_adjusted_value, SliderState};
