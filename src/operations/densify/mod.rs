mod geodesic_densify;

pub use geodesic_densify::GeodesicDensify;
