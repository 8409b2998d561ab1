//! Test utilities for station file parsing
//!
//! Shared fixtures used by the tokenizer and station parser tests.

mod station_tests;

/// Minimal station file from the exchange format documentation
pub fn create_minimal_station_file() -> String {
    r#"CTD,20030101WHPOSIOSCD
LATITUDE = 12.34,
LONGITUDE = -65.00,
CTDPRS,CTDTMP,CTDSAL
DBAR,ITS-90,PSS-78
10.0,20.0,35.0
20.0,20.5,35.1
END_DATA"#
        .to_string()
}

/// Station file shaped like a real WOCE exchange CTD file
pub fn create_woce_station_file() -> String {
    r#"CTD,20030604WHPOSIODAM
# Original data submitted by the ship
# Reformatted for exchange
NUMBER_HEADERS = 11
EXPOCODE = 33RO20030604
SECT_ID = A20
STNNBR = 1
CASTNO = 1
DATE = 20030925
TIME = 2308
LATITUDE = 6.8950
LONGITUDE = -52.4283
DEPTH = 46
CTDPRS,CTDPRS_FLAG_W,CTDTMP,CTDTMP_FLAG_W,CTDSAL,CTDSAL_FLAG_W,CTDOXY,CTDOXY_FLAG_W
DBAR,,ITS-90,,PSS-78,,UMOL/KG,
      2.0,2,  27.8631,2,  34.0112,2,    193.7,2
      4.0,2,  27.8644,2,  34.0124,2,    193.9,2
# bottle fired here
      6.0,2,  27.8651,2,  34.0119,2,,9

      8.0,2,  27.8669,2,-999.0000,9,    194.2,2
END_DATA
trailing text after the terminator"#
        .to_string()
}
