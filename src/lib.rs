#![allow(dead_code)]

pub mod agent;
pub mod driver;
pub mod tetris;

pub mod utils {
    pub mod prelude {
        pub use anyhow::{anyhow, Context, Error};
        pub type Result<T> = anyhow::Result<T, Error>;
    }
}

pub mod prelude {
    pub use super::agent::*;
    pub use super::driver::*;
    pub use super::tetris::prelude::*;
    pub use super::utils::prelude::*;
}
