//! One batch run: csv in, projected partitions, csv out.

use crate::identity::GroupIdSource;
use crate::partition::{compute_gravity_partitions, GravBox};
use crate::points::Point;
use crate::projection::{Projection, ProjectionError, UtmProjection, UtmZone};
use crate::records::{self, CenterRecord, LocationRecord, PositionRecord, RecordError};
use crate::setup::Config;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Records(#[from] RecordError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

impl EngineError {
    // distinct process exit codes per failing stage
    pub fn exit_code(&self) -> i32 {
        match self {
            EngineError::Records(RecordError::DestinationUnavailable { .. }) => 5,
            EngineError::Records(_) => 3,
            EngineError::Projection(_) => 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub locations: usize,
    pub groups: usize,
    pub largest_group: usize,
    pub zone: Option<UtmZone>,
    pub positions_path: PathBuf,
    pub centers_path: PathBuf,
}

/// Everything a run writes, before it touches the disk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grouping {
    pub positions: Vec<PositionRecord>,
    pub centers: Vec<CenterRecord>,
}

pub fn run(config: &Config, ids: &mut dyn GroupIdSource) -> Result<RunSummary, EngineError> {
    let locations = records::read_locations(config.input())?;
    let count = locations.len();
    info!(count, input = %config.input().display(), "loaded locations");

    let first = locations.first().map(|l| (l.longitude, l.latitude));

    // no location, no zone to guess: the outputs only get their headers
    let (grouping, zone) = match first {
        None => (Grouping::default(), None),
        Some((lon, lat)) => {
            let projection = match config.zone() {
                Some(zone) => UtmProjection::new(zone)?,
                None => UtmProjection::for_location(lon, lat)?,
            };
            info!(zone = %projection.zone(), epsg = %projection.zone().epsg(), "projecting locations");
            let grouping = group_locations(locations, &projection, config, ids)?;
            (grouping, Some(projection.zone()))
        }
    };

    let positions_path = config.positions_path();
    let centers_path = config.centers_path();
    let rendered = |path: &PathBuf, bytes: Result<Vec<u8>, csv::Error>| {
        bytes.map_err(|e| RecordError::DestinationUnavailable {
            path: path.clone(),
            reason: e.to_string(),
        })
    };
    let outputs = vec![
        (positions_path.clone(), rendered(&positions_path, records::position_csv(&grouping.positions))?),
        (centers_path.clone(), rendered(&centers_path, records::center_csv(&grouping.centers))?),
    ];
    records::write_all_or_nothing(&outputs)?;

    let summary = RunSummary {
        locations: count,
        groups: grouping.centers.len(),
        largest_group: largest_group(&grouping),
        zone,
        positions_path,
        centers_path,
    };
    info!(
        groups = summary.groups,
        largest = summary.largest_group,
        positions = %summary.positions_path.display(),
        centers = %summary.centers_path.display(),
        "partitioning written"
    );
    Ok(summary)
}

/*
Projects the locations, partitions them, hands every group a fresh id and
projects members and centers back to geographic coordinates.
*/
pub fn group_locations<P: Projection + ?Sized>(
    locations: Vec<LocationRecord>,
    projection: &P,
    config: &Config,
    ids: &mut dyn GroupIdSource,
) -> Result<Grouping, EngineError> {
    let lon_lat: Vec<(f64, f64)> = locations.iter().map(|l| (l.longitude, l.latitude)).collect();
    let xy = projection.forward(&lon_lat)?;
    let points: Vec<Point> = locations
        .into_iter()
        .zip(xy)
        .map(|(l, (x, y))| Point::with_id(x, y, l.user_id))
        .collect();

    let boxes = compute_gravity_partitions(points, config.dim_max(), config.snap());
    debug!(boxes = boxes.len(), maxdim = config.dim_max(), "partitioned");

    let mut member_xy = Vec::new();
    let mut member_ids = Vec::new();
    let mut center_xy = Vec::with_capacity(boxes.len());
    let mut center_ids = Vec::with_capacity(boxes.len());
    for (members, center) in boxes.into_iter().map(GravBox::into_parts) {
        let gid = ids.next_group_id();
        for p in members {
            member_xy.push((p.x, p.y));
            member_ids.push((p.id, gid.clone()));
        }
        center_xy.push((center.x, center.y));
        center_ids.push(gid);
    }

    let member_geo = projection.inverse(&member_xy)?;
    let center_geo = projection.inverse(&center_xy)?;

    let positions = member_ids
        .into_iter()
        .zip(member_geo)
        .map(|((uid, gid), (lon, lat))| PositionRecord {
            uid,
            gid,
            latitude: lat,
            longitude: lon,
        })
        .collect();
    let centers = center_ids
        .into_iter()
        .zip(center_geo)
        .map(|(gid, (lon, lat))| CenterRecord {
            gid,
            latitude: lat,
            longitude: lon,
        })
        .collect();

    Ok(Grouping { positions, centers })
}

fn largest_group(grouping: &Grouping) -> usize {
    let mut sizes = std::collections::HashMap::new();
    for p in grouping.positions.iter() {
        *sizes.entry(p.gid.as_str()).or_insert(0usize) += 1;
    }
    sizes.values().cloned().max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // planar == geographic, keeps the arithmetic easy to follow
    struct Identity;

    impl Projection for Identity {
        fn forward(&self, lon_lat: &[(f64, f64)]) -> Result<Vec<(f64, f64)>, ProjectionError> {
            Ok(lon_lat.to_vec())
        }
        fn inverse(&self, xy: &[(f64, f64)]) -> Result<Vec<(f64, f64)>, ProjectionError> {
            Ok(xy.to_vec())
        }
    }

    fn location(id: &str, lon: f64, lat: f64) -> LocationRecord {
        LocationRecord {
            user_id: id.to_owned(),
            latitude: lat,
            longitude: lon,
        }
    }

    fn counter() -> impl FnMut() -> String {
        let mut n = 0;
        move || {
            n += 1;
            format!("g{}", n)
        }
    }

    #[test]
    fn corners_get_one_group_each() {
        let locations = vec![
            location("a", 0.0, 0.0),
            location("b", 10.0, 0.0),
            location("c", 0.0, 10.0),
            location("d", 10.0, 10.0),
        ];
        let config = Config::new("unused.csv", "unused", 1);
        let grouping = group_locations(locations, &Identity, &config, &mut counter()).unwrap();

        let gids: Vec<(&str, &str)> = grouping.positions.iter().map(|p| (p.uid.as_str(), p.gid.as_str())).collect();
        assert_eq!(gids, vec![("c", "g1"), ("a", "g2"), ("b", "g3"), ("d", "g4")]);
        assert_eq!(
            grouping.centers[0],
            CenterRecord {
                gid: "g1".to_owned(),
                latitude: 10.0,
                longitude: 0.0
            }
        );
        assert_eq!(largest_group(&grouping), 1);
    }

    #[test]
    fn one_group_when_everything_fits() {
        let locations = vec![location("x", 1.0, 1.0), location("y", 2.0, 2.0)];
        let config = Config::new("unused.csv", "unused", 5);
        let grouping = group_locations(locations, &Identity, &config, &mut counter()).unwrap();
        assert_eq!(grouping.centers.len(), 1);
        assert_eq!(grouping.positions.len(), 2);
        assert!(grouping.positions.iter().all(|p| p.gid == "g1"));
        assert_eq!((grouping.centers[0].longitude, grouping.centers[0].latitude), (1.0, 1.0));
    }

    #[test]
    fn exit_codes_per_stage() {
        let malformed = EngineError::from(RecordError::MalformedRecord {
            line: None,
            reason: String::new(),
        });
        let unavailable = EngineError::from(RecordError::DestinationUnavailable {
            path: PathBuf::from("x"),
            reason: String::new(),
        });
        let projection = EngineError::from(ProjectionError::Setup {
            target: String::new(),
            reason: String::new(),
        });
        assert_eq!(malformed.exit_code(), 3);
        assert_eq!(unavailable.exit_code(), 5);
        assert_eq!(projection.exit_code(), 4);
    }
}
