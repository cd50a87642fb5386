pub mod buffer;
pub mod densify;
pub mod query;
