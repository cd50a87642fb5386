pub mod error;
pub mod geodesy;
pub mod geometry;
pub mod kernel;
pub mod math;
pub mod operations;

pub use error::{GeodesicError, Result};
pub use geodesy::Ellipsoid;
pub use geometry::{Envelope, Geometry, Path, Polygon, Polyline, Ring};
pub use operations::buffer::{buffer, BufferOptions, GeodesicBuffer};
