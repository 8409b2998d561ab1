//! Parser for WOCE exchange CTD station files
//!
//! A station file carries free-form metadata and comment lines, a
//! `LATITUDE`/`LONGITUDE` pair, a `CTDPRS,...` header line followed by a
//! units line, comma separated data rows and an `END_DATA` terminator:
//!
//! ```text
//! CTD,20030101WHPOSIOSCD
//! # comment
//! EXPOCODE = 33RO20030604
//! LATITUDE = 12.34,
//! LONGITUDE = -65.00,
//! CTDPRS,CTDTMP,CTDSAL
//! DBAR,ITS-90,PSS-78
//! 10.0,20.0,35.0
//! 20.0,20.5,35.1
//! END_DATA
//! ```
//!
//! ## Architecture
//!
//! - [`tokenizer`] - pure line classification for a given parser state
//! - [`fields`] - metadata, header and data field parsing
//! - [`station`] - the state machine assembling a [`StationTable`]
//!
//! [`StationTable`]: crate::models::StationTable

pub mod fields;
pub mod station;
pub mod tokenizer;

#[cfg(test)]
pub mod tests;

pub use station::{ParsedStation, StationParser};
pub use tokenizer::{LineKind, ParserState, classify};
