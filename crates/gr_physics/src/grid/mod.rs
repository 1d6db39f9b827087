// crates/gr_physics/src/grid/mod.rs

//! 结构化网格与进程拓扑

pub mod coords;
pub mod topology;

pub use coords::{CoordinateGrid, Location, ZoneBox};
pub use topology::{CommHandle, ProcessTopology};
