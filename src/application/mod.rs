pub mod chart_binding;
pub mod use_cases;

pub use chart_binding::*;
pub use use_cases::*;
