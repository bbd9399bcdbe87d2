/*
 *  An AI-driven Tetris playfield engine in Rust.
 */

pub(crate) mod block;
pub(crate) mod consts;
pub mod coords;
pub(crate) mod grid;
pub(crate) mod shape;
pub(crate) mod stream;

pub mod prelude {
    pub(crate) use crate::utils::prelude::*;

    pub use super::{
        block::Block,
        consts::*,
        coords::Coord,
        grid::{Grid, Snapshot, SpawnOutcome},
        shape::{Crust, Shape, ShapeTable},
        stream::{SevenBag, ShapeStream},
    };
}
