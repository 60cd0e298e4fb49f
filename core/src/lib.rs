pub mod config;
pub mod geometry;
pub mod polygon;

/// Version of the polygon core crate.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
