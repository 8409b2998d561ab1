//! Station file parser
//!
//! Drives the line classifier through the
//! `SeekingPosition -> SeekingHeader -> ReadingData -> Done` state machine.
//! The data collected so far travels inside the state value, so a state
//! can only be reached with the data it needs.

use tracing::debug;

use super::fields::{header_columns, parse_data_row, parse_metadata_value};
use super::tokenizer::{LineKind, ParserState, classify};
use crate::constants::markers;
use crate::error::{CtdError, Result};
use crate::models::{MeasurementTable, RawStationFile, StationPosition, StationTable};

/// Result of parsing one station file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStation {
    pub station: StationTable,

    /// Recoverable oddities noticed while parsing
    pub warnings: Vec<String>,
}

enum Phase {
    SeekingPosition,
    SeekingHeader(StationPosition),
    ReadingData(StationPosition, MeasurementTable),
    Done(StationPosition, MeasurementTable),
}

impl Phase {
    fn state(&self) -> ParserState {
        match self {
            Phase::SeekingPosition => ParserState::SeekingPosition,
            Phase::SeekingHeader(_) => ParserState::SeekingHeader,
            Phase::ReadingData(..) => ParserState::ReadingData,
            Phase::Done(..) => ParserState::Done,
        }
    }
}

/// Parser for WOCE exchange CTD station files
#[derive(Debug, Default, Clone, Copy)]
pub struct StationParser;

impl StationParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_file(&self, file: &RawStationFile) -> Result<ParsedStation> {
        self.parse(&file.id, &file.content)
    }

    /// Parse the text of one station file identified by `id`
    pub fn parse(&self, id: &str, content: &str) -> Result<ParsedStation> {
        let mut lines = content.lines().enumerate();
        let mut phase = Phase::SeekingPosition;

        while let Some((index, raw)) = lines.next() {
            let line = raw.trim();
            let line_no = index + 1;

            let kind = classify(line, phase.state());
            phase = match (phase, kind) {
                (Phase::SeekingPosition, LineKind::PositionMetadata) => {
                    let position = read_position(id, line, line_no, &mut lines)?;
                    debug!(
                        "{}: station position ({}, {})",
                        id, position.latitude, position.longitude
                    );
                    Phase::SeekingHeader(position)
                }
                (Phase::SeekingHeader(position), LineKind::Header) => {
                    let columns = header_columns(line);
                    debug!("{}: header with {} columns", id, columns.len());
                    // units row, whatever it contains
                    lines.next();
                    Phase::ReadingData(position, MeasurementTable::new(id, columns))
                }
                (Phase::ReadingData(position, table), LineKind::Terminator) => {
                    Phase::Done(position, table)
                }
                (Phase::ReadingData(position, mut table), LineKind::DataRow) => {
                    let row = parse_data_row(line, position).map_err(|reason| {
                        CtdError::malformed(id, format!("line {line_no}: {reason}"))
                    })?;
                    if row.len() != table.columns().len() {
                        return Err(CtdError::malformed(
                            id,
                            format!(
                                "line {}: row has {} fields but header has {}",
                                line_no,
                                row.len() - 2,
                                table.columns().len() - 2
                            ),
                        ));
                    }
                    table.push_row(row)?;
                    Phase::ReadingData(position, table)
                }
                (phase, _) => phase,
            };

            if matches!(phase, Phase::Done(..)) {
                break;
            }
        }

        let mut warnings = Vec::new();
        let (position, table) = match phase {
            Phase::SeekingPosition => {
                return Err(CtdError::malformed(
                    id,
                    format!("no {} position line found", markers::LATITUDE),
                ));
            }
            Phase::SeekingHeader(_) => {
                return Err(CtdError::malformed(
                    id,
                    format!("no {} header line found", markers::HEADER),
                ));
            }
            Phase::ReadingData(position, table) => {
                warnings.push(format!(
                    "{}: no {} marker, read to end of file",
                    id,
                    markers::END_DATA
                ));
                (position, table)
            }
            Phase::Done(position, table) => (position, table),
        };

        debug!("{}: parsed {} rows", id, table.len());

        Ok(ParsedStation {
            station: StationTable {
                source: id.to_string(),
                position,
                table,
            },
            warnings,
        })
    }
}

/// Read the latitude from `line` and the longitude from the line after it
fn read_position<'a>(
    id: &str,
    line: &str,
    line_no: usize,
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Result<StationPosition> {
    let latitude = parse_metadata_value(line)
        .map_err(|reason| CtdError::malformed(id, format!("line {line_no}: {reason}")))?;

    let (next_index, next_raw) = lines.next().ok_or_else(|| {
        CtdError::malformed(id, format!("file ends after {} line", markers::LATITUDE))
    })?;
    let next_line = next_raw.trim();
    if !next_line.starts_with(markers::LONGITUDE) {
        return Err(CtdError::malformed(
            id,
            format!(
                "line {}: expected {} after {}",
                next_index + 1,
                markers::LONGITUDE,
                markers::LATITUDE
            ),
        ));
    }

    let longitude = parse_metadata_value(next_line)
        .map_err(|reason| CtdError::malformed(id, format!("line {}: {}", next_index + 1, reason)))?;

    StationPosition::new(latitude, longitude).ok_or_else(|| {
        CtdError::malformed(
            id,
            format!("non-finite position ({}, {})", latitude, longitude),
        )
    })
}
