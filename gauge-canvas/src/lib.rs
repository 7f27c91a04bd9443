mod canvas;
#[cfg(feature = "png")]
mod png;
pub use canvas::{Canvas, Output};
#[cfg(feature = "png")]
pub use png::PngFile;
