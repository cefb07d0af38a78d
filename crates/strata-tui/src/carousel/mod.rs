//! Snap-navigation physics for the abstraction carousel
//!
//! Turns discrete scroll input into a continuous carousel position with
//! momentum, adaptive input gain, and magnetic snapping onto chain levels.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `config` - Engine configuration (sections re-exported from strata-core)
//! - `timing` - Frame-time normalization and interpolation helpers
//! - `bounds` - Legal scroll range from reachable levels
//! - `layout` - Per-level pixel offsets from non-uniform item sizes
//! - `snap` - Snap target selection
//!
//! ## L3 Molecular Layer
//! - `state` - Physics state and velocity history
//! - `input` - Adaptive sensitivity input shaping
//! - `physics` - Free/Snapping state machine
//! - `render` - Position to scale, opacity and size
//! - `driver` - Frame loop arming and settling
//!
//! ## L2 Organism Layer
//! - `engine` - Facade owning the state and notifying a frame sink
//!
//! # Usage
//!
//! ```ignore
//! use strata_tui::carousel::{Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::default());
//! engine.activate(chain);
//! engine.set_sink(|out: &FrameOutput| println!("{:.3}", out.position));
//!
//! engine.scroll(120.0);
//! while engine.wants_frame() {
//!     engine.tick(Duration::from_millis(16));
//! }
//! ```

// L4 Atomic Layer
pub mod bounds;
pub mod config;
pub mod layout;
pub mod snap;
pub mod timing;

// L3 Molecular Layer
pub mod driver;
pub mod input;
pub mod physics;
pub mod render;
pub mod state;

// L2 Organism Layer
pub mod engine;

// Re-exports for convenient access
pub use bounds::Bounds;
pub use config::{EngineConfig, FrameConfigExt, LayoutConfigExt};
pub use driver::{FrameDriver, FramePlan};
pub use engine::{Engine, FrameSink};
pub use input::InputShaper;
pub use layout::LayoutTable;
pub use physics::{PhysicsStepper, StepEvent};
pub use render::{FrameOutput, ItemVisual, RenderInterpolator};
pub use state::{PhysicsState, VelocityHistory};
