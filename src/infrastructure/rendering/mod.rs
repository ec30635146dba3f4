pub mod canvas_renderer;
pub mod headless;
pub mod scene;
pub mod surface_model;

pub use canvas_renderer::CanvasSurface;
pub use headless::{HeadlessSurface, SurfaceStats};
pub use scene::Scene;
pub use surface_model::SurfaceModel;
