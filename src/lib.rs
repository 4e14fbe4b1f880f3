//! Groups geolocated entities into spatially compact clusters of bounded
//! size, by repeatedly splitting oversized groups into quadrants around their
//! center of gravity.

#[macro_use]
extern crate clap;
#[macro_use]
extern crate serde_derive;

pub mod engine;
pub mod identity;
pub mod partition;
pub mod points;
pub mod projection;
pub mod records;
pub mod setup;

pub use crate::partition::{compute_gravity_partitions, GravBox, SnapMode};
pub use crate::points::{Point, Quadrant};
