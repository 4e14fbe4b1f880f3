//! Geographic ↔ planar conversion for one batch of coordinates.
//!
//! All coordinates of a batch go through one UTM zone, picked once (from the
//! first location unless the caller forces one). Points far outside that zone
//! still convert, with growing distortion.

mod utm;
mod zone;

pub use self::utm::UtmProjection;
pub use self::zone::{zone_letter, zone_number, UtmZone};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectionError {
    /// No transform could be built for the requested coordinate systems.
    #[error("cannot set up projection for {target}: {reason}")]
    Setup { target: String, reason: String },

    /// A single coordinate could not be converted.
    #[error("cannot project coordinate #{index} ({a}, {b}): {reason}")]
    Transform { index: usize, a: f64, b: f64, reason: String },
}

/// Converts between geographic `(lon, lat)` degrees and planar `(x, y)`.
pub trait Projection {
    fn forward(&self, lon_lat: &[(f64, f64)]) -> Result<Vec<(f64, f64)>, ProjectionError>;
    fn inverse(&self, xy: &[(f64, f64)]) -> Result<Vec<(f64, f64)>, ProjectionError>;
}
