//! Line classification for WOCE exchange station files
//!
//! Classification is a pure function of the stripped line and the parser's
//! current state; the station parser owns all state transitions.

use crate::constants::markers;

/// States of the station file parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    SeekingPosition,
    SeekingHeader,
    ReadingData,
    Done,
}

/// What a line means in the current parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `LATITUDE = ...`, to be followed by the `LONGITUDE` line
    PositionMetadata,
    /// Column header line starting with `CTDPRS`
    Header,
    /// `END_DATA`
    Terminator,
    /// Comma separated values after the header
    DataRow,
    /// Anything the current state skips
    Noise,
}

/// Classify a whitespace-stripped line for the given parser state
pub fn classify(line: &str, state: ParserState) -> LineKind {
    match state {
        ParserState::SeekingPosition if line.starts_with(markers::LATITUDE) => {
            LineKind::PositionMetadata
        }
        ParserState::SeekingHeader if line.starts_with(markers::HEADER) => LineKind::Header,
        ParserState::ReadingData if line.starts_with(markers::END_DATA) => LineKind::Terminator,
        ParserState::ReadingData if !line.is_empty() && !line.starts_with(markers::COMMENT) => {
            LineKind::DataRow
        }
        _ => LineKind::Noise,
    }
}
