pub mod load_candlesticks;
pub mod render_chart;

pub use load_candlesticks::*;
pub use render_chart::*;
