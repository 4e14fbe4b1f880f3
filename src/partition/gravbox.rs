use crate::points::Point;

/// How a finished box picks its representative.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SnapMode {
    /// Coordinates of the first member in iteration order. This is what the
    /// original tool produced, so it stays the default.
    FirstMember,
    /// Coordinates of the member closest to the centroid, earliest on ties.
    Nearest,
}

impl Default for SnapMode {
    fn default() -> SnapMode {
        SnapMode::FirstMember
    }
}

/*
A group of points together with their center of gravity.
Owns its members. While splitting, the members move into the children.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct GravBox {
    points: Vec<Point>,
    center: Point,
}

impl GravBox {
    pub fn empty() -> GravBox {
        GravBox {
            points: Vec::new(),
            center: Point::origin(),
        }
    }

    // center is the mean of `points`. NaN when `points` is empty
    pub fn new(points: Vec<Point>) -> GravBox {
        let mut center = Point::origin();
        for p in points.iter() {
            center += p;
        }
        center /= points.len() as f64;
        GravBox { points, center }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn center(&self) -> &Point {
        &self.center
    }

    pub fn into_parts(self) -> (Vec<Point>, Point) {
        (self.points, self.center)
    }

    // true when no split can ever separate the members
    pub fn is_coincident(&self) -> bool {
        match self.points.first() {
            Some(first) => self.points.iter().all(|p| p.same_coords(first)),
            None => true,
        }
    }

    /// Moves every member into the child of its quadrant around `center`.
    /// Children come out in `Quadrant::ALL` order; empty ones are dropped.
    pub fn split(self) -> Vec<GravBox> {
        let GravBox { points, center } = self;
        let mut quads: [GravBox; 4] = array_init::array_init(|_| GravBox::empty());

        for p in points {
            let quad = &mut quads[center.quadrant_of(&p).index()];
            // center doubles as a running sum until every point is placed
            quad.center += &p;
            quad.points.push(p);
        }

        quads
            .into_iter()
            .filter(|gb| !gb.points.is_empty())
            .map(|mut gb| {
                gb.center /= gb.points.len() as f64;
                gb
            })
            .collect()
    }

    pub fn snap_center(&mut self, mode: SnapMode) {
        let snapped = match mode {
            SnapMode::FirstMember => self.points.first(),
            SnapMode::Nearest => {
                let c = &self.center;
                self.points.iter().fold(None, |best: Option<&Point>, p| match best {
                    Some(b) if b.sq_dist_to(c) <= p.sq_dist_to(c) => Some(b),
                    _ => Some(p),
                })
            }
        };
        if let Some(p) = snapped {
            self.center = p.coords();
        }
    }
}
