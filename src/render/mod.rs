mod camera;
mod renderer;
mod style;

pub use camera::*;
pub use renderer::*;
pub use style::*;
