mod geodetic_length;

pub use geodetic_length::GeodeticLength;
