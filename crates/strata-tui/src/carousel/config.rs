//! L4 Atomic Layer: Configuration types for the carousel engine
//!
//! Re-exports configuration sections from strata-core and bundles the ones
//! the engine needs.

use std::time::Duration;

// Re-export config types from core
pub use strata_core::{
    AppConfig, FrameConfig, InputConfig, LayoutAxis, LayoutConfig, PhysicsConfig, RenderConfig,
};
use strata_core::ItemSize;

/// Configuration sections consumed by [`Engine`](super::Engine)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub physics: PhysicsConfig,
    pub input: InputConfig,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub frame: FrameConfig,
}

impl From<&AppConfig> for EngineConfig {
    /// Sections are repaired first, so an unsanitized config is safe to pass
    fn from(config: &AppConfig) -> Self {
        let config = config.clone().sanitize();
        Self {
            physics: config.physics.clone(),
            input: config.input.clone(),
            layout: config.layout.clone(),
            render: config.render.clone(),
            frame: config.frame.clone(),
        }
    }
}

/// Extension trait for FrameConfig with utility methods
pub trait FrameConfigExt {
    /// Get tick duration for the animation frame rate
    fn frame_duration(&self) -> Duration;

    /// Longest frame that still runs physics
    fn max_frame_delta(&self) -> Duration;

    /// Elapsed time expressed in reference frames
    fn frame_multiplier(&self, elapsed: Duration) -> f64;
}

impl FrameConfigExt for FrameConfig {
    #[inline]
    fn frame_duration(&self) -> Duration {
        if self.fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_nanos(1_000_000_000 / self.fps as u64)
        }
    }

    #[inline]
    fn max_frame_delta(&self) -> Duration {
        Duration::from_millis(self.max_frame_delta_ms)
    }

    #[inline]
    fn frame_multiplier(&self, elapsed: Duration) -> f64 {
        super::timing::frame_multiplier(elapsed, self.reference_frame_ms)
    }
}

/// Extension trait for LayoutConfig
pub trait LayoutConfigExt {
    /// Size used for items without a recorded size
    fn default_size(&self) -> ItemSize;

    /// Extent of a size along the scroll axis
    fn extent(&self, size: ItemSize) -> f64;
}

impl LayoutConfigExt for LayoutConfig {
    #[inline]
    fn default_size(&self) -> ItemSize {
        ItemSize::new(self.default_width, self.default_height)
    }

    #[inline]
    fn extent(&self, size: ItemSize) -> f64 {
        match self.axis {
            LayoutAxis::Horizontal => size.width,
            LayoutAxis::Vertical => size.height,
        }
    }
}
