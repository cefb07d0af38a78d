use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use strata_core::{AppConfig, ChainSnapshot};

use crate::carousel::{Engine, EngineConfig, FrameOutput};
use crate::input::Action;
use crate::theme::Theme;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal browsing mode
    Normal,
    /// Help overlay
    Help,
}

/// Application state for the terminal carousel
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Snap-navigation engine driving the carousel
    pub engine: Engine,
    pub theme: Theme,
    /// Chain document the carousel was loaded from, if any
    pub chain_path: Option<PathBuf>,
    /// Latest published frame
    pub frame: Option<FrameOutput>,
    /// Current application mode
    pub mode: Mode,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
}

impl App {
    pub fn new(config: Arc<AppConfig>, chain: ChainSnapshot, chain_path: Option<PathBuf>) -> Self {
        let mut engine = Engine::new(EngineConfig::from(config.as_ref()));
        engine.activate(chain);
        let frame = engine.current_output();

        Self {
            config,
            engine,
            theme: Theme::default(),
            chain_path,
            frame,
            mode: Mode::Normal,
            should_quit: false,
            status_message: None,
        }
    }

    /// Whether the carousel needs frames at the animation rate
    pub fn needs_frame(&self) -> bool {
        self.engine.wants_frame()
    }

    /// Advance the carousel by one frame
    pub fn update(&mut self, elapsed: Duration) {
        if let Some(output) = self.engine.tick(elapsed) {
            self.frame = Some(output);
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::StepForward => {
                if self.engine.step_by(1).is_none() {
                    self.set_status("Already at the most general level");
                }
            }
            Action::StepBack => {
                if self.engine.step_by(-1).is_none() {
                    self.set_status("Already at the most specific level");
                }
            }
            Action::Home => {
                self.engine.home();
            }
            Action::Nudge(delta) => self.engine.scroll(delta),
            Action::Reload => match self.reload_chain() {
                Ok(()) => self.set_status("Chain reloaded"),
                Err(e) => {
                    tracing::warn!("Chain reload failed: {:#}", e);
                    self.set_status(format!("Reload failed: {}", e));
                }
            },
            Action::ToggleHelp => {
                self.mode = match self.mode {
                    Mode::Normal => Mode::Help,
                    Mode::Help => Mode::Normal,
                };
            }
            Action::ExitMode => self.mode = Mode::Normal,
            Action::None => {}
        }
    }

    /// Feed a raw wheel delta
    pub fn scroll(&mut self, delta: f64) {
        self.clear_status();
        self.engine.scroll(delta);
    }

    /// Re-read the chain document; same identity keeps the position
    pub fn reload_chain(&mut self) -> Result<()> {
        let path = self
            .chain_path
            .as_ref()
            .ok_or_else(|| anyhow!("no chain file to reload"))?;
        let chain = ChainSnapshot::load(path)
            .with_context(|| format!("loading {}", path.display()))?;
        self.engine.set_chain(chain);
        Ok(())
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
