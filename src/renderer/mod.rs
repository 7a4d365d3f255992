//! Rendering module
//!
//! Surfaces are drawn through the `Surface` trait: a 2D canvas in the
//! browser, a software pixel buffer natively.

pub mod color;
pub mod paint;
pub mod pixel;
pub mod shapes;
pub mod surface;

pub use color::Rgba;
pub use paint::{Backdrop, PaintStyle, Renderer};
pub use pixel::{PixelSurface, Rgba8};
pub use surface::Surface;
