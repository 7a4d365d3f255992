//! Backdrop FX - decorative real-time effects layered behind a web page
//!
//! Core modules:
//! - `sim`: Entity pools and the per-tick update rules (projection, decay, recycling)
//! - `renderer`: Surface abstraction, software rasterizer and per-entity painting
//! - `scheduler`: Frame cadence (display rate or throttled) over an injectable clock
//! - `effect` / `stage`: Effect instances and the set of instances running on a page
//! - `viewport`, `device`, `settings`: Host-derived dimensions, capability and configuration
//! - `web`: Browser canvas surface and capability probing (wasm32 only)

pub mod device;
pub mod effect;
pub mod error;
pub mod input;
pub mod renderer;
pub mod reveal;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod stage;
pub mod transform;
pub mod viewport;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use device::{CapabilitySignals, DeviceProfile};
pub use effect::{EffectInstance, EffectKind};
pub use error::ConfigError;
pub use input::InputEvent;
pub use settings::Settings;
pub use stage::Stage;
pub use viewport::{Viewport, ViewportDimensions};

/// Engine timing and capacity constants
pub mod consts {
    /// One logical tick (60 Hz reference frame). Per-tick rates are expressed against this.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Same tick in milliseconds
    pub const TICK_MS: f64 = 1000.0 / 60.0;
    /// Maximum ticks per displayed frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Largest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Stars per device class
    pub const STARS_CONSTRAINED: usize = 50;
    pub const STARS_FULL: usize = 200;
    /// Pointer particles per device class
    pub const PARTICLES_CONSTRAINED: usize = 100;
    pub const PARTICLES_FULL: usize = 500;
    /// Cursor sparkles/ripples per device class
    pub const SPARKLES_CONSTRAINED: usize = 64;
    pub const SPARKLES_FULL: usize = 256;
    /// Cursor trail ring length
    pub const TRAIL_LENGTH: usize = 20;
    /// Upper bound on matrix rain columns
    pub const MAX_RAIN_COLUMNS: usize = 400;
    /// Height of the wave band surface (pixels)
    pub const WAVE_BAND_HEIGHT: f32 = 200.0;
}
