//! Seawater physics capability
//!
//! The derivation stage only needs four pure elementwise functions of the
//! TEOS-10 family. They sit behind [`SeawaterPhysics`] so the pipeline can
//! run against the built-in [`ReferenceSeawater`] or a stub in tests.

pub mod reference;

pub use reference::ReferenceSeawater;

use thiserror::Error;

/// Input outside a function's validity range, or a non-finite result
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{quantity} {value} outside valid range [{min}, {max}]")]
    OutOfRange {
        quantity: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{function} produced a non-finite result")]
    NonFinite { function: &'static str },
}

pub type PhysicsResult<T> = std::result::Result<T, DomainError>;

/// Equation-of-state functions used by the derivation stage
///
/// Units: pressure in dbar (sea pressure), temperatures in deg C (ITS-90),
/// salinities in g/kg (absolute) or PSS-78 (practical), positions in
/// decimal degrees.
pub trait SeawaterPhysics: Send + Sync {
    /// Height `z` in metres, negative below the sea surface
    fn z_from_pressure(&self, pressure: f64, latitude: f64) -> PhysicsResult<f64>;

    fn absolute_salinity_from_practical(
        &self,
        salinity: f64,
        pressure: f64,
        longitude: f64,
        latitude: f64,
    ) -> PhysicsResult<f64>;

    fn conservative_temperature_from_insitu(
        &self,
        absolute_salinity: f64,
        in_situ_temperature: f64,
        pressure: f64,
    ) -> PhysicsResult<f64>;

    /// Speed of sound in m/s
    fn sound_speed(
        &self,
        absolute_salinity: f64,
        conservative_temperature: f64,
        pressure: f64,
    ) -> PhysicsResult<f64>;
}

/// Check `value` lies in `[min, max]`; NaN never does
pub(crate) fn check_range(quantity: &'static str, value: f64, min: f64, max: f64) -> PhysicsResult<f64> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(DomainError::OutOfRange {
            quantity,
            value,
            min,
            max,
        })
    }
}

/// Reject NaN and infinite results
pub(crate) fn finite(function: &'static str, value: f64) -> PhysicsResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::NonFinite { function })
    }
}
