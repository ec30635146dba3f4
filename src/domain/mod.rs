//! Domain layer: bars, derived chart series and the ports the chart binding drives.

pub mod chart;
pub mod errors;
pub mod logging;
pub mod market_data;
