//! Zip archive reading
//!
//! Each cruise archive holds one exchange-format text file per station.
//! Station files are identified as `<archive file name>:<entry path>`.

use super::discovery::has_extension;
use crate::error::{CtdError, Result};
use crate::models::RawStationFile;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Station files read from one archive
#[derive(Debug, Default)]
pub struct ArchiveEntries {
    pub files: Vec<RawStationFile>,
    /// Station entries that could not be decoded, one error each
    pub rejected: Vec<CtdError>,
}

impl ArchiveEntries {
    /// Number of station file entries, decoded or not
    pub fn station_file_count(&self) -> usize {
        self.files.len() + self.rejected.len()
    }
}

/// Open `path` and read every station file entry
///
/// Failure to open the archive is returned as an error; a bad entry only
/// lands in [`ArchiveEntries::rejected`].
pub fn read_archive(path: &Path, station_extension: &str) -> Result<ArchiveEntries> {
    let archive_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    read_station_files(&archive_name, File::open(path)?, station_extension)
}

/// Read station files from any seekable zip source
pub fn read_station_files<R: Read + Seek>(
    archive_name: &str,
    reader: R,
    station_extension: &str,
) -> Result<ArchiveEntries> {
    let mut archive = ZipArchive::new(reader)?;
    let mut entries = ArchiveEntries::default();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if !entry.is_file() || !has_extension(Path::new(entry.name()), station_extension) {
            continue;
        }

        let id = format!("{}:{}", archive_name, entry.name());
        // the declared entry size is untrusted, so the buffer grows as data arrives
        let mut bytes = Vec::new();
        if let Err(e) = entry.read_to_end(&mut bytes) {
            entries
                .rejected
                .push(CtdError::malformed(id, format!("cannot read entry: {}", e)));
            continue;
        }

        match String::from_utf8(bytes) {
            Ok(content) => entries.files.push(RawStationFile::new(id, content)),
            Err(e) => entries
                .rejected
                .push(CtdError::malformed(id, format!("not valid UTF-8: {}", e))),
        }
    }

    debug!(
        "{}: {} station files, {} rejected",
        archive_name,
        entries.files.len(),
        entries.rejected.len()
    );
    Ok(entries)
}
