use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Sub, SubAssign};

//planar point in 2d space. `id` is only set on concrete input locations
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub id: String,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y, id: String::new() }
    }

    pub fn with_id<S: Into<String>>(x: f64, y: f64, id: S) -> Point {
        Point { x, y, id: id.into() }
    }

    pub fn origin() -> Point {
        Point::new(0.0, 0.0)
    }

    // same coordinates, no identifier
    pub fn coords(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn sq_dist_to(&self, o: &Point) -> f64 {
        let dx = self.x - o.x;
        let dy = self.y - o.y;
        dx * dx + dy * dy
    }

    pub fn same_coords(&self, o: &Point) -> bool {
        self.x == o.x && self.y == o.y
    }

    /// Quadrant of `p` relative to `self`. Ties go East and North.
    pub fn quadrant_of(&self, p: &Point) -> Quadrant {
        Quadrant::classify(self, p)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.id.is_empty() {
            write!(f, "({}, {})", self.x, self.y)
        } else {
            write!(f, "{}@({}, {})", self.id, self.x, self.y)
        }
    }
}

/*
The arithmetic below works on coordinates only. The left operand keeps its
identifier untouched, so a centroid that starts from `Point::origin()` never
picks one up.
*/
impl<'a> AddAssign<&'a Point> for Point {
    fn add_assign(&mut self, rhs: &'a Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl<'a> SubAssign<&'a Point> for Point {
    fn sub_assign(&mut self, rhs: &'a Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl<'a> DivAssign<&'a Point> for Point {
    fn div_assign(&mut self, rhs: &'a Point) {
        self.x /= rhs.x;
        self.y /= rhs.y;
    }
}

impl DivAssign<f64> for Point {
    fn div_assign(&mut self, rhs: f64) {
        self.x /= rhs;
        self.y /= rhs;
    }
}

impl<'a> Add<&'a Point> for Point {
    type Output = Point;
    fn add(mut self, rhs: &'a Point) -> Point {
        self += rhs;
        self
    }
}

impl<'a> Sub<&'a Point> for Point {
    type Output = Point;
    fn sub(mut self, rhs: &'a Point) -> Point {
        self -= rhs;
        self
    }
}

impl<'a> Div<&'a Point> for Point {
    type Output = Point;
    fn div(mut self, rhs: &'a Point) -> Point {
        self /= rhs;
        self
    }
}

impl Div<f64> for Point {
    type Output = Point;
    fn div(mut self, rhs: f64) -> Point {
        self /= rhs;
        self
    }
}

// discriminants index the four candidate children of a split
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NorthWest = 0,
    SouthWest = 1,
    SouthEast = 2,
    NorthEast = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
        Quadrant::NorthEast,
    ];

    pub fn classify(reference: &Point, p: &Point) -> Quadrant {
        if p.x >= reference.x {
            //east
            if p.y >= reference.y {
                Quadrant::NorthEast
            } else {
                Quadrant::SouthEast
            }
        } else {
            //west
            if p.y >= reference.y {
                Quadrant::NorthWest
            } else {
                Quadrant::SouthWest
            }
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}
