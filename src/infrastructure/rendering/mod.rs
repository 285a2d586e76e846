pub mod canvas_surface;
pub mod image_loader;

pub use canvas_surface::*;
pub use image_loader::*;
