//! Application constants for the CTD processor
//!
//! Column names, exchange-format markers, sentinel values and default
//! paths used throughout the pipeline.

// =============================================================================
// Column Names
// =============================================================================

pub const LATITUDE: &str = "LATITUDE";
pub const LONGITUDE: &str = "LONGITUDE";
pub const PRESSURE: &str = "CTDPRS";
pub const TEMPERATURE: &str = "CTDTMP";
pub const SALINITY: &str = "CTDSAL";

/// Columns kept from every station file, in output order
pub const CANONICAL_COLUMNS: &[&str] = &[LATITUDE, LONGITUDE, PRESSURE, TEMPERATURE, SALINITY];

/// Measurement columns averaged during aggregation
pub const MEASUREMENT_COLUMNS: &[&str] = &[PRESSURE, TEMPERATURE, SALINITY];

/// Columns appended by the derivation stage
pub mod derived {
    pub const DEPTH: &str = "depth_m";
    pub const ABSOLUTE_SALINITY: &str = "SA";
    pub const CONSERVATIVE_TEMPERATURE: &str = "CT";
    pub const SOUND_SPEED: &str = "sound_speed";

    pub const COLUMNS: &[&str] = &[
        DEPTH,
        ABSOLUTE_SALINITY,
        CONSERVATIVE_TEMPERATURE,
        SOUND_SPEED,
    ];
}

// =============================================================================
// Exchange Format Markers
// =============================================================================

pub mod markers {
    /// Start of the position metadata pair
    pub const LATITUDE: &str = "LATITUDE";

    /// Second line of the position metadata pair
    pub const LONGITUDE: &str = "LONGITUDE";

    /// First column of the data header line
    pub const HEADER: &str = "CTDPRS";

    /// End of the data section
    pub const END_DATA: &str = "END_DATA";

    pub const COMMENT: char = '#';
    pub const KEY_VALUE_SEPARATOR: char = '=';
    pub const FIELD_SEPARATOR: char = ',';
}

// =============================================================================
// Quality Constants
// =============================================================================

/// Reserved literals the exchange format uses for "missing"
///
/// Matched by exact equality, never as a range.
pub const SENTINEL_VALUES: &[f64] = &[-999.0, -9999.0, 9999.0, 99999.0];

// =============================================================================
// Defaults
// =============================================================================

pub const DEFAULT_ARCHIVE_EXTENSION: &str = "zip";
pub const DEFAULT_STATION_FILE_EXTENSION: &str = "csv";
pub const DEFAULT_PROCESSED_SUFFIX: &str = "_processed";

/// Extension of every table the pipeline writes
pub const TABLE_EXTENSION: &str = "csv";

pub const DEFAULT_PROCESSED_DIR: &str = "processed_data";
pub const DEFAULT_AGGREGATED_FILE: &str = "aggregated.csv";
pub const DEFAULT_DERIVED_FILE: &str = "derived.csv";

/// Upper bound for the default worker count
pub const MAX_DEFAULT_WORKERS: usize = 8;

/// Returns true when `value` is one of the exchange-format sentinels
pub fn is_sentinel(value: f64) -> bool {
    SENTINEL_VALUES.contains(&value)
}
