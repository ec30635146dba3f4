//! Chart aggregate: derived series, display value objects and the surface port.

pub mod entities;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use services::*;
pub use value_objects::*;
