use crate::tetris::prelude::*;

/// A placement of a shape: rotation index plus playfield offset. Pure
/// kinematics; collision-aware movement lives on the grid.
#[derive(Clone, Copy, Debug)]
pub struct Block<'a> {
    pub shape: &'a Shape,
    pub rot: usize,
    pub offset: Coord,
}

impl<'a> Block<'a> {
    /// A fresh block at rotation 0 and the origin.
    pub fn new(shape: &'a Shape) -> Block<'a> {
        Block {
            shape,
            rot: 0,
            offset: Coord::new(0, 0),
        }
    }

    /// A block at an explicit rotation and offset.
    pub fn at(shape: &'a Shape, rot: usize, offset: Coord) -> Block<'a> {
        Block { shape, rot, offset }
    }

    /// Absolute coordinates of the four cells.
    pub fn cells(&self) -> [Coord; MAX_BLOCK_LEN] {
        self.shape.cells(self.rot).map(|c| c + self.offset)
    }

    /// Bounding box of the current rotation.
    pub fn rot_wh(&self) -> Coord {
        self.shape.rot_wh(self.rot)
    }

    /// Rotates by any amount, clockwise-positive, wrapping over the shape's
    /// distinct rotation count.
    pub fn rotate(&mut self, amount: i32) {
        let n = self.shape.n_rot as i32;
        self.rot = (self.rot as i32 + amount).rem_euclid(n) as usize;
    }

    /// Translates along a direction.
    pub fn shift(&mut self, dir: Direction, amount: i32) {
        self.offset = self.offset + dir.step().scaled(amount);
    }

    /// The extreme occupied coordinate along a direction.
    pub fn extreme(&self, dir: Direction) -> i32 {
        let wh = self.rot_wh();
        match dir {
            Direction::Left => self.offset.x,
            Direction::Bot => self.offset.y,
            Direction::Right => self.offset.x + wh.x - 1,
            Direction::Top => self.offset.y + wh.y - 1,
        }
    }

    /// Absolute coordinates of the crust cells along a direction.
    pub fn crust_cells(&self, dir: Direction) -> impl Iterator<Item = Coord> + '_ {
        self.shape
            .crust(self.rot, dir)
            .cells()
            .iter()
            .map(move |c| *c + self.offset)
    }
}
