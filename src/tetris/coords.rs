use std::ops::{Add, Sub};

/// Simple playfield coordinate; x is the column counted from the left wall,
/// y is the row counted from the floor. Signed so that block kinematics can
/// pass through out-of-bounds states before validation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    /// Constructs a new coord.
    pub fn new(x: i32, y: i32) -> Coord {
        Coord { x, y }
    }

    /// Scales both components, for multi-cell steps.
    pub fn scaled(&self, k: i32) -> Coord {
        Coord {
            x: self.x * k,
            y: self.y * k,
        }
    }
}

impl Add<Coord> for Coord {
    type Output = Coord;
    fn add(self, rhs: Coord) -> Self::Output {
        Coord {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub<Coord> for Coord {
    type Output = Coord;
    fn sub(self, rhs: Coord) -> Self::Output {
        Coord {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}
