use super::{Projection, ProjectionError, UtmZone};
use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use std::fmt::Debug;
use tracing::debug;

const WGS84_GEO: &str = "+proj=longlat +ellps=WGS84 +datum=WGS84 +no_defs";

fn setup_failure<E: Debug>(zone: &UtmZone, e: E) -> ProjectionError {
    ProjectionError::Setup {
        target: zone.epsg(),
        reason: format!("{:?}", e),
    }
}

/// WGS 84 geographic coordinates to and from one UTM zone.
pub struct UtmProjection {
    zone: UtmZone,
    geo: Proj,
    utm: Proj,
}

impl UtmProjection {
    pub fn new(zone: UtmZone) -> Result<UtmProjection, ProjectionError> {
        let geo = Proj::from_proj_string(WGS84_GEO).map_err(|e| setup_failure(&zone, e))?;
        let utm = Proj::from_proj_string(&zone.proj_string()).map_err(|e| setup_failure(&zone, e))?;
        debug!(zone = %zone, epsg = %zone.epsg(), "projection ready");
        Ok(UtmProjection { zone, geo, utm })
    }

    /// Guesses the zone from one geographic coordinate, usually the first of
    /// the batch.
    pub fn for_location(lon: f64, lat: f64) -> Result<UtmProjection, ProjectionError> {
        match UtmZone::containing(lon, lat) {
            Some(zone) => UtmProjection::new(zone),
            None => Err(ProjectionError::Setup {
                target: format!("({}, {})", lon, lat),
                reason: "coordinate lies outside of UTM coverage".to_owned(),
            }),
        }
    }

    pub fn zone(&self) -> UtmZone {
        self.zone
    }

    fn convert(&self, from: &Proj, to: &Proj, index: usize, a: f64, b: f64) -> Result<(f64, f64), ProjectionError> {
        let fail = |reason: String| ProjectionError::Transform { index, a, b, reason };
        if !a.is_finite() || !b.is_finite() {
            return Err(fail("not a finite coordinate".to_owned()));
        }
        let mut point = (a, b, 0.0);
        transform(from, to, &mut point).map_err(|e| fail(format!("{:?}", e)))?;
        if point.0.is_finite() && point.1.is_finite() {
            Ok((point.0, point.1))
        } else {
            Err(fail("projection diverged".to_owned()))
        }
    }
}

// proj4rs wants geographic coordinates in radians
impl Projection for UtmProjection {
    fn forward(&self, lon_lat: &[(f64, f64)]) -> Result<Vec<(f64, f64)>, ProjectionError> {
        lon_lat
            .iter()
            .enumerate()
            .map(|(i, &(lon, lat))| {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(ProjectionError::Transform {
                        index: i,
                        a: lon,
                        b: lat,
                        reason: "latitude out of range".to_owned(),
                    });
                }
                self.convert(&self.geo, &self.utm, i, lon.to_radians(), lat.to_radians())
            })
            .collect()
    }

    fn inverse(&self, xy: &[(f64, f64)]) -> Result<Vec<(f64, f64)>, ProjectionError> {
        xy.iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let (lon, lat) = self.convert(&self.utm, &self.geo, i, x, y)?;
                Ok((lon.to_degrees(), lat.to_degrees()))
            })
            .collect()
    }
}
