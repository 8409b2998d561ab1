//! Field parsing utilities for station file lines
//!
//! Helpers return plain `String` reasons; the station parser attaches the
//! file identifier and line number when turning them into errors.

use crate::constants::{LATITUDE, LONGITUDE, markers};
use crate::models::{MeasurementRow, StationPosition};

/// Parse the numeric value of a `KEY = value,` metadata line
pub fn parse_metadata_value(line: &str) -> Result<f64, String> {
    let (key, value) = line
        .split_once(markers::KEY_VALUE_SEPARATOR)
        .ok_or_else(|| format!("expected '{}' in '{}'", markers::KEY_VALUE_SEPARATOR, line))?;

    let value = value.trim().trim_matches(markers::FIELD_SEPARATOR).trim();
    value
        .parse::<f64>()
        .map_err(|e| format!("invalid {} value '{}': {}", key.trim(), value, e))
}

/// Column names of a header line, prefixed with the position columns
pub fn header_columns(line: &str) -> Vec<String> {
    [LATITUDE.to_string(), LONGITUDE.to_string()]
        .into_iter()
        .chain(
            line.split(markers::FIELD_SEPARATOR)
                .map(|name| name.trim().to_string()),
        )
        .collect()
}

/// Parse a single data field; empty fields are null
pub fn parse_optional_f64(field: &str) -> Result<Option<f64>, String> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("invalid numeric field '{}'", trimmed))
}

/// Parse a data line into a row prefixed with the station position
pub fn parse_data_row(line: &str, position: StationPosition) -> Result<MeasurementRow, String> {
    let mut values = vec![Some(position.latitude), Some(position.longitude)];
    for field in line.split(markers::FIELD_SEPARATOR) {
        values.push(parse_optional_f64(field)?);
    }
    Ok(MeasurementRow::new(values))
}
