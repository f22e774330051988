//! `x y z intensity` text point cloud support
//!
//! One point per line, four whitespace-separated numbers, no header. Lines
//! that do not have exactly that shape are skipped rather than failing the
//! load, so a scan with a few damaged rows still opens.

use crate::error::{LoadError, RecordError};
use cloudview_core::{IntensityPoint3f, IntensityPointCloud};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

/// Lines longer than this are rejected without being parsed. At most this
/// many bytes (plus one) of a line are held in memory.
pub const MAX_RECORD_BYTES: usize = 4096;

/// Number of fields in a record
const FIELDS: usize = 4;

/// One successfully parsed line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    /// 1-based line number in the source
    pub line: usize,
    pub point: IntensityPoint3f,
}

/// Parse a single line into a point.
///
/// The line must hold exactly four finite numbers separated by any amount
/// of whitespace.
pub fn parse_record(line: &str) -> std::result::Result<IntensityPoint3f, String> {
    let mut values = [0.0f32; FIELDS];
    let mut count = 0;

    for field in line.split_whitespace() {
        if count == FIELDS {
            return Err(format!("expected {} fields, found more", FIELDS));
        }
        let value = field
            .parse::<f32>()
            .map_err(|_| format!("invalid number {:?}", field))?;
        if !value.is_finite() {
            return Err(format!("non-finite value {:?}", field));
        }
        values[count] = value;
        count += 1;
    }

    if count != FIELDS {
        return Err(format!("expected {} fields, found {}", FIELDS, count));
    }

    Ok(IntensityPoint3f::new(values[0], values[1], values[2], values[3]))
}

/// Lazy sequence of candidate records read line by line from `R`.
///
/// Yields `Ok` for well-formed lines, `RecordError::Malformed` for lines
/// that should be skipped and `RecordError::Io` if the reader fails.
pub struct IntensityRecords<R> {
    reader: R,
    buffer: Vec<u8>,
    line: usize,
    failed: bool,
}

impl<R: BufRead> IntensityRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(128),
            line: 0,
            failed: false,
        }
    }

    /// Discard input up to and including the next newline
    fn skip_rest_of_line(&mut self) -> std::io::Result<()> {
        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(());
            }

            let (used, done) = match available.iter().position(|&b| b == b'\n') {
                Some(end) => (end + 1, true),
                None => (available.len(), false),
            };
            self.reader.consume(used);
            if done {
                return Ok(());
            }
        }
    }
}

impl<R: BufRead> Iterator for IntensityRecords<R> {
    type Item = std::result::Result<Record, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        self.buffer.clear();
        let limit = MAX_RECORD_BYTES as u64 + 1;
        match (&mut self.reader).take(limit).read_until(b'\n', &mut self.buffer) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(e) => {
                self.failed = true;
                return Some(Err(RecordError::Io(e)));
            }
        }
        self.line += 1;
        let line = self.line;

        if self.buffer.len() > MAX_RECORD_BYTES {
            if self.buffer.last() != Some(&b'\n') {
                if let Err(e) = self.skip_rest_of_line() {
                    self.failed = true;
                    return Some(Err(RecordError::Io(e)));
                }
            }
            return Some(Err(RecordError::Malformed {
                line,
                reason: format!("line longer than {} bytes", MAX_RECORD_BYTES),
            }));
        }

        let text = match std::str::from_utf8(&self.buffer) {
            Ok(text) => text,
            Err(_) => {
                return Some(Err(RecordError::Malformed {
                    line,
                    reason: "not valid UTF-8".to_string(),
                }))
            }
        };

        Some(
            parse_record(text)
                .map(|point| Record { line, point })
                .map_err(|reason| RecordError::Malformed { line, reason }),
        )
    }
}

/// Intensity XYZ reader implementation
pub struct IntensityXyzReader;

impl IntensityXyzReader {
    /// Read a cloud from any buffered source, skipping malformed lines
    pub fn read_from<R: BufRead>(reader: R) -> std::io::Result<IntensityPointCloud> {
        let mut cloud = IntensityPointCloud::new();
        let mut skipped = 0usize;

        for record in IntensityRecords::new(reader) {
            match record {
                Ok(record) => cloud.push(record.point),
                Err(RecordError::Malformed { line, reason }) => {
                    log::trace!("skipping line {}: {}", line, reason);
                    skipped += 1;
                }
                Err(RecordError::Io(e)) => return Err(e),
            }
        }

        if skipped > 0 {
            log::debug!("skipped {} malformed records", skipped);
        }
        Ok(cloud)
    }

    /// Read a cloud from a file.
    ///
    /// A missing or unreadable file is reported as
    /// [`LoadError::DataUnavailable`]; malformed lines are never errors.
    pub fn read_point_cloud<P: AsRef<Path>>(path: P) -> std::result::Result<IntensityPointCloud, LoadError> {
        let path = path.as_ref();
        let unavailable = |source| LoadError::DataUnavailable {
            path: path.display().to_string(),
            source,
        };

        let file = File::open(path).map_err(unavailable)?;
        let cloud = Self::read_from(BufReader::new(file)).map_err(unavailable)?;

        let bounds = cloud.bounds();
        log::info!(
            "loaded {} points from {} (lower {:?}, upper {:?})",
            cloud.len(),
            path.display(),
            bounds.lower.coords.as_slice(),
            bounds.upper.coords.as_slice(),
        );
        Ok(cloud)
    }
}
