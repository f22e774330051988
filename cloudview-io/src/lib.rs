//! Point cloud loading for cloudview
//!
//! Reads whitespace-delimited `x y z intensity` text scans into an
//! [`IntensityPointCloud`] with its bounds and center.

pub mod intensity_xyz;
pub mod error;

pub use error::*;
pub use intensity_xyz::{parse_record, IntensityRecords, IntensityXyzReader, Record, MAX_RECORD_BYTES};

use cloudview_core::IntensityPointCloud;
use std::path::Path;

/// Load an `x y z intensity` text file.
///
/// Returns [`LoadError::DataUnavailable`] if the file cannot be opened or
/// read; lines that do not hold four numbers are skipped.
pub fn load_intensity_cloud<P: AsRef<Path>>(path: P) -> std::result::Result<IntensityPointCloud, LoadError> {
    IntensityXyzReader::read_point_cloud(path)
}
