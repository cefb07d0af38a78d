//! L2 Organism Layer: Carousel engine facade
//!
//! Owns the physics state for one chain snapshot, routes input into the
//! shaper and state machine, and publishes a [`FrameOutput`] to the
//! registered sink once per frame while active.

use std::fmt;
use std::time::Duration;

use strata_core::ChainSnapshot;

use super::bounds::Bounds;
use super::config::EngineConfig;
use super::driver::{FrameDriver, FramePlan};
use super::input::InputShaper;
use super::layout::LayoutTable;
use super::physics::{PhysicsStepper, StepEvent};
use super::render::{FrameOutput, RenderInterpolator};
use super::state::PhysicsState;
use super::timing::nearest_level;

/// Receiver of per-frame outputs
pub trait FrameSink {
    fn on_frame(&mut self, output: &FrameOutput);
}

impl<F> FrameSink for F
where
    F: FnMut(&FrameOutput),
{
    fn on_frame(&mut self, output: &FrameOutput) {
        self(output)
    }
}

/// State tied to one chain snapshot; discarded on deactivation or identity change
#[derive(Debug, Clone)]
struct Session {
    chain: ChainSnapshot,
    bounds: Bounds,
    layout: LayoutTable,
    state: PhysicsState,
}

/// Snap-navigation engine
///
/// Call [`Engine::activate`] with a chain, feed input through
/// [`Engine::scroll`] / [`Engine::jump_to`], and call [`Engine::tick`] every
/// frame while [`Engine::wants_frame`] is true.
pub struct Engine {
    config: EngineConfig,
    shaper: InputShaper,
    stepper: PhysicsStepper,
    render: RenderInterpolator,
    driver: FrameDriver,
    session: Option<Session>,
    sink: Option<Box<dyn FrameSink>>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("driver", &self.driver)
            .field("session", &self.session)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            shaper: InputShaper::new(config.input.clone()),
            stepper: PhysicsStepper::new(config.physics.clone()),
            render: RenderInterpolator::new(config.render.clone(), config.layout.clone()),
            driver: FrameDriver::new(config.frame.clone()),
            session: None,
            sink: None,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register the receiver of frame outputs, replacing any previous one
    pub fn set_sink(&mut self, sink: impl FrameSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    pub fn clear_sink(&mut self) {
        self.sink = None;
    }

    /// Start a fresh session for this chain
    pub fn activate(&mut self, chain: ChainSnapshot) {
        self.driver.cancel();
        tracing::debug!(
            concept = %chain.id().concept_id,
            dimension = %chain.id().dimension,
            items = chain.len(),
            "Carousel activated"
        );
        let empty = chain.is_empty();
        self.session = Some(self.new_session(chain));
        if !empty {
            self.driver.request_frame();
        }
    }

    /// Discard the session and cancel any pending frame
    pub fn deactivate(&mut self) {
        self.driver.cancel();
        if self.session.take().is_some() {
            tracing::debug!("Carousel deactivated");
        }
    }

    /// Replace the chain snapshot
    ///
    /// A different identity resets physics; the same identity keeps the
    /// position and re-derives bounds and layout (e.g. after sizes were
    /// measured). An empty snapshot always resets to the inert state.
    pub fn set_chain(&mut self, chain: ChainSnapshot) {
        let Some(session) = self.session.as_mut() else {
            tracing::trace!("Ignoring chain update while inactive");
            return;
        };

        if session.chain.id() != chain.id() {
            tracing::debug!(
                from = %session.chain.id().concept_id,
                to = %chain.id().concept_id,
                "Chain identity changed, resetting physics"
            );
            self.activate(chain);
            return;
        }

        if chain.is_empty() {
            tracing::debug!("Chain emptied, carousel is inert");
            self.activate(chain);
            return;
        }

        session.bounds = Bounds::compute(&chain, &self.config.physics);
        session.layout = LayoutTable::build(&chain, &self.config.layout);
        session.chain = chain;
        session.state.position = session.bounds.clamp(session.state.position);
        if session.state.is_snapping {
            session.state.target_position = session.bounds.clamp(session.state.target_position);
        }
        self.driver.request_frame();
    }

    /// Feed one raw scroll delta
    pub fn scroll(&mut self, raw_delta: f64) {
        let Some(session) = live_session(&mut self.session) else {
            return;
        };
        self.shaper.apply(&mut session.state, raw_delta);
        self.driver.request_frame();
    }

    /// Animate to an explicit level, clamped into bounds
    ///
    /// # Returns
    /// The snap target, or `None` when the engine is inert
    pub fn jump_to(&mut self, level: i32) -> Option<f64> {
        let session = live_session(&mut self.session)?;
        let target = self.stepper.jump(&mut session.state, &session.bounds, level);
        self.driver.request_frame();
        Some(target)
    }

    /// Move to the next reachable level in `direction` (sign only)
    ///
    /// Steps from the in-flight snap target when snapping, so repeated
    /// presses queue up levels. Returns the target level, or `None` at the
    /// end of the chain.
    pub fn step_by(&mut self, direction: i32) -> Option<i32> {
        let session = live_session(&mut self.session)?;
        let origin = if session.state.is_snapping {
            nearest_level(session.state.target_position)
        } else {
            nearest_level(session.state.position)
        };

        let next = if direction > 0 {
            session.chain.reachable_levels().find(|&level| level > origin)
        } else if direction < 0 {
            session.chain.reachable_levels().filter(|&level| level < origin).last()
        } else {
            None
        }?;

        self.jump_to(next);
        Some(next)
    }

    /// Return to the level-0 item
    pub fn home(&mut self) -> Option<f64> {
        self.jump_to(0)
    }

    /// Run one frame
    ///
    /// Returns the published output, or `None` when inactive, inert, or no
    /// frame was requested.
    pub fn tick(&mut self, elapsed: Duration) -> Option<FrameOutput> {
        let Some(session) = self.session.as_mut().filter(|s| !s.chain.is_empty()) else {
            self.driver.cancel();
            return None;
        };

        let (event, stepped) = match self.driver.begin_frame(elapsed) {
            FramePlan::Skip => return None,
            FramePlan::SkipPhysics => (StepEvent::Idle, false),
            FramePlan::Step(multiplier) => (
                self.stepper
                    .step(&mut session.state, &session.bounds, multiplier),
                true,
            ),
        };

        let state = &session.state;
        let at_rest = state.is_at_rest(self.config.physics.min_velocity);
        let output = self.render.frame(
            &session.chain,
            &session.layout,
            state.position,
            state.is_snapping,
            at_rest,
        );

        tracing::trace!(
            position = output.position,
            velocity = state.velocity,
            snapping = state.is_snapping,
            ?event,
            "Frame"
        );

        if let Some(sink) = self.sink.as_mut() {
            sink.on_frame(&output);
        }
        // A skipped frame never decided a snap target, so it cannot settle
        if stepped {
            self.driver.settle(at_rest);
        }

        Some(output)
    }

    /// Output for the current state without stepping or notifying
    pub fn current_output(&self) -> Option<FrameOutput> {
        let session = self.session.as_ref().filter(|s| !s.chain.is_empty())?;
        let state = &session.state;
        Some(self.render.frame(
            &session.chain,
            &session.layout,
            state.position,
            state.is_snapping,
            state.is_at_rest(self.config.physics.min_velocity),
        ))
    }

    /// Whether the host should schedule another frame
    #[inline]
    pub fn wants_frame(&self) -> bool {
        self.driver.is_armed()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn state(&self) -> Option<&PhysicsState> {
        self.session.as_ref().map(|s| &s.state)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.session.as_ref().map(|s| s.bounds)
    }

    pub fn layout(&self) -> Option<&LayoutTable> {
        self.session.as_ref().map(|s| &s.layout)
    }

    pub fn chain(&self) -> Option<&ChainSnapshot> {
        self.session.as_ref().map(|s| &s.chain)
    }

    pub fn position(&self) -> Option<f64> {
        self.state().map(|s| s.position)
    }

    fn new_session(&self, chain: ChainSnapshot) -> Session {
        Session {
            bounds: Bounds::compute(&chain, &self.config.physics),
            layout: LayoutTable::build(&chain, &self.config.layout),
            state: PhysicsState::new(self.config.input.history_capacity),
            chain,
        }
    }
}

/// Session that accepts input: active with a non-empty chain
fn live_session(session: &mut Option<Session>) -> Option<&mut Session> {
    match session.as_mut() {
        Some(session) if !session.chain.is_empty() => Some(session),
        Some(_) => {
            tracing::trace!("Ignoring input for empty chain");
            None
        }
        None => {
            tracing::trace!("Ignoring input while inactive");
            None
        }
    }
}
