//! L3 Molecular Layer: Frame loop arming and settling
//!
//! The driver does not own a timer. Hosts ask [`FrameDriver::is_armed`] to
//! decide whether to schedule another frame, and feed each frame's elapsed
//! time through [`FrameDriver::begin_frame`].

use std::time::Duration;

use super::config::{FrameConfig, FrameConfigExt};

/// How the engine should treat the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FramePlan {
    /// No frame was requested
    Skip,
    /// Emit outputs but leave physics untouched (oversized delta)
    SkipPhysics,
    /// Step physics by this many reference frames
    Step(f64),
}

#[derive(Debug, Clone)]
pub struct FrameDriver {
    config: FrameConfig,
    armed: bool,
    /// No frame has run since the driver was last armed
    first_frame: bool,
}

impl FrameDriver {
    pub fn new(config: FrameConfig) -> Self {
        Self {
            config,
            armed: false,
            first_frame: false,
        }
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Arm the loop; a no-op when already running
    pub fn request_frame(&mut self) {
        if !self.armed {
            tracing::trace!("Frame loop armed");
            self.armed = true;
            self.first_frame = true;
        }
    }

    /// Drop any pending frame request
    pub fn cancel(&mut self) {
        if self.armed {
            tracing::trace!("Frame loop cancelled");
        }
        self.armed = false;
        self.first_frame = false;
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Plan the frame for this elapsed time
    pub fn begin_frame(&mut self, elapsed: Duration) -> FramePlan {
        if !self.armed {
            return FramePlan::Skip;
        }

        let first = std::mem::replace(&mut self.first_frame, false);
        let max_delta = self.config.max_frame_delta();
        if elapsed <= max_delta {
            return FramePlan::Step(self.config.frame_multiplier(elapsed));
        }

        if first || self.config.skip_long_frames {
            tracing::debug!(
                elapsed_ms = elapsed.as_millis() as u64,
                first,
                "Skipping physics for oversized frame"
            );
            return FramePlan::SkipPhysics;
        }

        tracing::trace!(
            elapsed_ms = elapsed.as_millis() as u64,
            "Capping oversized frame"
        );
        FramePlan::Step(self.config.frame_multiplier(max_delta))
    }

    /// Finish a frame; a settled state stops the loop
    pub fn settle(&mut self, at_rest: bool) {
        if at_rest {
            self.cancel();
        }
    }
}
