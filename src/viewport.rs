//! Viewport dimensions and resize notification
//!
//! The stage owns one authoritative `Viewport`. Effects never cache its size
//! across frames; they compare `revision()` and re-read before each pass.

use serde::{Deserialize, Serialize};

/// Width/height of a drawing area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportDimensions {
    pub width: f32,
    pub height: f32,
}

impl ViewportDimensions {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero, negative or NaN sizes are "not yet renderable": skip the frame.
    #[inline]
    pub fn is_renderable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Projection center
    #[inline]
    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whole-pixel size for surfaces (0 when not renderable)
    pub fn pixel_size(&self) -> (u32, u32) {
        if !self.is_renderable() {
            return (0, 0);
        }
        (self.width.round() as u32, self.height.round() as u32)
    }
}

type ResizeHandler = Box<dyn FnMut(ViewportDimensions)>;

/// The observed display area plus its resize subscribers
pub struct Viewport {
    dims: ViewportDimensions,
    revision: u64,
    handlers: Vec<ResizeHandler>,
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport")
            .field("dims", &self.dims)
            .field("revision", &self.revision)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            dims: ViewportDimensions::new(width, height),
            revision: 0,
            handlers: Vec::new(),
        }
    }

    /// Current size
    #[inline]
    pub fn current_size(&self) -> ViewportDimensions {
        self.dims
    }

    /// Bumped on every effective resize
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Register a callback invoked with the new size after each effective resize
    pub fn on_resize(&mut self, handler: impl FnMut(ViewportDimensions) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Apply an observed size. Returns false (and notifies nobody) when unchanged.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let next = ViewportDimensions::new(width, height);
        if next == self.dims {
            return false;
        }
        self.dims = next;
        self.revision += 1;
        log::debug!("Viewport resized to {}x{} (rev {})", width, height, self.revision);
        for handler in self.handlers.iter_mut() {
            handler(next);
        }
        true
    }
}
