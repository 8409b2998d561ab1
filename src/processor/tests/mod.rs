//! Test utilities for the pipeline stages
//!
//! In-memory zip archives, station file fixtures and a stub physics
//! implementation shared by the stage tests.


use crate::physics::{DomainError, PhysicsResult, SeawaterPhysics};
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Mutex;
use zip::CompressionMethod;
use zip::write::FileOptions;

/// Build a zip archive in memory from `(entry name, bytes)` pairs
pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        for (name, bytes) in entries {
            let options: FileOptions<'_, ()> =
                FileOptions::default().compression_method(CompressionMethod::Stored);
            zip.start_file(*name, options).unwrap();
            zip.write_all(bytes).unwrap();
        }
        zip.finish().unwrap();
    }
    buf
}

/// Write a zip archive to `path`
pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let entries: Vec<(&str, &[u8])> = entries
        .iter()
        .map(|(name, content)| (*name, content.as_bytes()))
        .collect();
    std::fs::write(path, build_zip(&entries)).unwrap();
}

/// Station file with the given position and `(CTDPRS, CTDTMP, CTDSAL)` rows
pub fn station_file(latitude: &str, longitude: &str, rows: &[&str]) -> String {
    let mut content = format!(
        "CTD,20030604WHPOSIODAM\n# test station\nEXPOCODE = 33RO20030604\nLATITUDE = {},\nLONGITUDE = {},\nCTDPRS,CTDPRS_FLAG_W,CTDTMP,CTDSAL,CTDOXY\nDBAR,,ITS-90,PSS-78,UMOL/KG\n",
        latitude, longitude
    );
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    content.push_str("END_DATA\n");
    content
}

/// Physics stub with trivially checkable formulas
///
/// `z = -p`, `SA = 2 * SP`, `CT = t + SA`, `c = 1400 + CT + p`. Records the
/// order functions are called in.
#[derive(Debug, Default)]
pub struct StubPhysics {
    calls: Mutex<Vec<&'static str>>,
    max_salinity: Option<f64>,
    nan_sound_speed: bool,
}

impl StubPhysics {
    pub fn rejecting_salinity_above(max: f64) -> Self {
        Self {
            max_salinity: Some(max),
            ..Default::default()
        }
    }

    pub fn returning_nan_sound_speed() -> Self {
        Self {
            nan_sound_speed: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, function: &'static str) {
        self.calls.lock().unwrap().push(function);
    }
}

impl SeawaterPhysics for StubPhysics {
    fn z_from_pressure(&self, pressure: f64, _latitude: f64) -> PhysicsResult<f64> {
        self.record("z_from_pressure");
        Ok(-pressure)
    }

    fn absolute_salinity_from_practical(
        &self,
        salinity: f64,
        _pressure: f64,
        _longitude: f64,
        _latitude: f64,
    ) -> PhysicsResult<f64> {
        self.record("absolute_salinity_from_practical");
        match self.max_salinity {
            Some(max) if salinity > max => Err(DomainError::OutOfRange {
                quantity: "practical salinity",
                value: salinity,
                min: 0.0,
                max,
            }),
            _ => Ok(2.0 * salinity),
        }
    }

    fn conservative_temperature_from_insitu(
        &self,
        absolute_salinity: f64,
        in_situ_temperature: f64,
        _pressure: f64,
    ) -> PhysicsResult<f64> {
        self.record("conservative_temperature_from_insitu");
        Ok(in_situ_temperature + absolute_salinity)
    }

    fn sound_speed(
        &self,
        _absolute_salinity: f64,
        conservative_temperature: f64,
        pressure: f64,
    ) -> PhysicsResult<f64> {
        self.record("sound_speed");
        if self.nan_sound_speed {
            return Ok(f64::NAN);
        }
        Ok(1400.0 + conservative_temperature + pressure)
    }
}
