//! Widgets for the progress dashboard.

pub mod gauges;

pub use gauges::render_gauges;
pub use gauges::GaugeRow;
