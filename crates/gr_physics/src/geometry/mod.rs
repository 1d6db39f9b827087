// crates/gr_physics/src/geometry/mod.rs

//! 时空几何
//!
//! - [`spacetime`]: 解析坐标映射与协变度规
//! - [`metric`]: 单区块度规量
//! - [`connection`]: 联络系数
//! - [`grid_geometry`]: 网格上的缓存几何

pub mod connection;
pub mod grid_geometry;
pub mod metric;
pub mod spacetime;

pub use connection::{christoffel, Connection, ConnectionStencil};
pub use grid_geometry::Geometry;
pub use metric::MetricField;
pub use spacetime::{horizon_radius, GeometryParameters, SpacetimeMap};
