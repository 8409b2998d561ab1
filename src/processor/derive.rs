//! Physical derivation of depth, absolute salinity, conservative
//! temperature and sound speed.
//!
//! Calls are made per record in a fixed order since each step feeds the
//! next. A record whose derivation fails is moved to the failure list and
//! the rest of the batch carries on.

use super::filter::DerivationFilter;
use super::report::DerivationReport;
use crate::error::{CtdError, Result};
use crate::models::{AggregatedRecord, DerivationFailure, DerivedRecord, ValidRecord};
use crate::physics::{DomainError, SeawaterPhysics};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct DerivationOutcome {
    pub records: Vec<DerivedRecord>,
    pub failures: Vec<DerivationFailure>,
    pub report: DerivationReport,
}

#[derive(Debug, Clone, Default)]
pub struct PhysicalDeriver<P> {
    physics: P,
}

impl<P: SeawaterPhysics> PhysicalDeriver<P> {
    pub fn new(physics: P) -> Self {
        Self { physics }
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    /// Derive the four properties for one record
    pub fn derive_record(&self, record: &ValidRecord) -> Result<DerivedRecord> {
        let fail = |step: &str, e: DomainError| CtdError::DerivationDomain {
            latitude: record.latitude,
            longitude: record.longitude,
            reason: format!("{}: {}", step, e),
        };
        let check = |step: &'static str, value: f64| {
            if value.is_finite() {
                Ok(value)
            } else {
                Err(fail(step, DomainError::NonFinite { function: step }))
            }
        };

        let z = self
            .physics
            .z_from_pressure(record.pressure, record.latitude)
            .map_err(|e| fail("z_from_pressure", e))?;
        let depth_m = check("z_from_pressure", -z)?;

        let absolute_salinity = self
            .physics
            .absolute_salinity_from_practical(
                record.salinity,
                record.pressure,
                record.longitude,
                record.latitude,
            )
            .map_err(|e| fail("absolute_salinity_from_practical", e))?;
        let absolute_salinity = check("absolute_salinity_from_practical", absolute_salinity)?;

        let conservative_temperature = self
            .physics
            .conservative_temperature_from_insitu(
                absolute_salinity,
                record.temperature,
                record.pressure,
            )
            .map_err(|e| fail("conservative_temperature_from_insitu", e))?;
        let conservative_temperature =
            check("conservative_temperature_from_insitu", conservative_temperature)?;

        let sound_speed = self
            .physics
            .sound_speed(absolute_salinity, conservative_temperature, record.pressure)
            .map_err(|e| fail("sound_speed", e))?;
        let sound_speed = check("sound_speed", sound_speed)?;

        Ok(DerivedRecord {
            record: *record,
            depth_m,
            absolute_salinity,
            conservative_temperature,
            sound_speed,
        })
    }

    /// Derive every record, collecting failures instead of stopping
    pub fn derive(&self, records: Vec<ValidRecord>) -> DerivationOutcome {
        let mut outcome = DerivationOutcome {
            report: DerivationReport {
                input_records: records.len(),
                ..Default::default()
            },
            ..Default::default()
        };

        for record in &records {
            match self.derive_record(record) {
                Ok(derived) => outcome.records.push(derived),
                Err(CtdError::DerivationDomain {
                    latitude,
                    longitude,
                    reason,
                }) => {
                    debug!("Derivation failed at ({}, {}): {}", latitude, longitude, reason);
                    outcome.failures.push(DerivationFailure {
                        latitude,
                        longitude,
                        reason,
                    });
                }
                Err(e) => {
                    outcome.failures.push(DerivationFailure {
                        latitude: record.latitude,
                        longitude: record.longitude,
                        reason: e.to_string(),
                    });
                }
            }
        }

        outcome.report.derived = outcome.records.len();
        outcome.report.failed = outcome.failures.len();
        if !outcome.failures.is_empty() {
            warn!(
                "{} of {} records failed derivation",
                outcome.failures.len(),
                records.len()
            );
        }
        outcome
    }

    /// Filter aggregated records then derive the survivors
    pub fn derive_aggregated(&self, records: Vec<AggregatedRecord>) -> DerivationOutcome {
        let total = records.len();
        let filtered = DerivationFilter::new().filter(records);
        let mut outcome = self.derive(filtered.records);
        outcome.report.input_records = total;
        outcome.report.filtered_out = filtered.dropped;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::tests::StubPhysics;

    fn valid(latitude: f64, salinity: f64) -> ValidRecord {
        ValidRecord {
            latitude,
            longitude: -65.0,
            pressure: 100.0,
            temperature: 10.0,
            salinity,
        }
    }

    #[test]
    fn test_derives_in_fixed_order() {
        let deriver = PhysicalDeriver::new(StubPhysics::default());
        let derived = deriver.derive_record(&valid(12.0, 35.0)).unwrap();

        // stub: z = -p, SA = 2 * SP, CT = t + SA, c = 1400 + CT + p
        assert_eq!(derived.depth_m, 100.0);
        assert_eq!(derived.absolute_salinity, 70.0);
        assert_eq!(derived.conservative_temperature, 80.0);
        assert_eq!(derived.sound_speed, 1580.0);
        assert_eq!(
            deriver.physics().calls(),
            [
                "z_from_pressure",
                "absolute_salinity_from_practical",
                "conservative_temperature_from_insitu",
                "sound_speed"
            ]
        );
    }

    #[test]
    fn test_failing_row_is_excluded_and_reported() {
        let deriver = PhysicalDeriver::new(StubPhysics::rejecting_salinity_above(40.0));
        let outcome = deriver.derive(vec![
            valid(1.0, 35.0),
            valid(2.0, 50.0),
            valid(3.0, 34.0),
        ]);

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].latitude, 2.0);
        assert!(
            outcome.failures[0]
                .reason
                .starts_with("absolute_salinity_from_practical")
        );
        assert_eq!(outcome.report.input_records, 3);
        assert_eq!(outcome.report.derived, 2);
        assert_eq!(outcome.report.failed, 1);
    }

    #[test]
    fn test_non_finite_output_is_a_failure() {
        let deriver = PhysicalDeriver::new(StubPhysics::returning_nan_sound_speed());
        let outcome = deriver.derive(vec![valid(1.0, 35.0)]);
        assert!(outcome.records.is_empty());
        assert!(outcome.failures[0].reason.contains("non-finite"));
    }

    #[test]
    fn test_derive_aggregated_filters_first() {
        let deriver = PhysicalDeriver::new(StubPhysics::default());
        let outcome = deriver.derive_aggregated(vec![
            AggregatedRecord {
                latitude: 1.0,
                longitude: Some(-65.0),
                pressure: Some(10.0),
                temperature: Some(20.0),
                salinity: Some(35.0),
            },
            AggregatedRecord {
                latitude: 2.0,
                longitude: Some(-65.0),
                pressure: Some(10.0),
                temperature: Some(20.0),
                salinity: Some(-999.0),
            },
        ]);
        assert_eq!(outcome.report.input_records, 2);
        assert_eq!(outcome.report.filtered_out, 1);
        assert_eq!(outcome.report.derived, 1);
        assert_eq!(outcome.records[0].record.latitude, 1.0);
    }
}
