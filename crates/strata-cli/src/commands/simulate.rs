use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::time::{interval, Instant, Interval, MissedTickBehavior};

use strata_core::{AppConfig, ChainSnapshot, ScriptCommand};
use strata_tui::carousel::{Engine, EngineConfig, FrameConfigExt, FrameOutput};

/// Upper bound on frames spent in a single `settle`
const MAX_SETTLE_FRAMES: u32 = 10_000;

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulateOptions {
    pub realtime: bool,
    pub json: bool,
    pub frame_ms: Option<f64>,
}

/// One published frame as printed by the simulator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    pub time_ms: f64,
    pub position: f64,
    pub focus_scale: f64,
    pub width: f64,
    pub height: f64,
    pub focused_level: Option<i32>,
    pub focused_label: Option<String>,
    pub snapping: bool,
    pub at_rest: bool,
}

pub async fn run(
    config: Arc<AppConfig>,
    script: &Path,
    chain_path: Option<PathBuf>,
    options: SimulateOptions,
) -> Result<()> {
    let commands = ScriptCommand::load(script)
        .with_context(|| format!("reading script {}", script.display()))?;
    let (chain, _) = super::load_chain(&config, chain_path)?;

    let step = match options.frame_ms {
        Some(ms) if ms.is_finite() && ms > 0.0 => Duration::from_secs_f64(ms / 1000.0),
        Some(ms) => anyhow::bail!("--frame-ms must be a positive number, got {}", ms),
        None => config.frame.frame_duration(),
    };
    let pacer = if options.realtime {
        Pacer::realtime(step)
    } else {
        Pacer::Fixed(step)
    };

    let mut simulator = Simulator::new(EngineConfig::from(config.as_ref()), chain);
    let reports = simulator.run(&commands, pacer).await;

    if options.json {
        for report in &reports {
            println!("{}", serde_json::to_string(report)?);
        }
    } else {
        print_table(&reports);
    }

    tracing::info!(
        frames = reports.len(),
        position = simulator.engine.position(),
        "Simulation finished"
    );
    Ok(())
}

fn print_table(reports: &[FrameReport]) {
    println!(
        "{:>6} {:>9} {:>9} {:>6} {:>11}  {:<6} {}",
        "frame", "time_ms", "position", "focus", "size", "state", "focused"
    );
    for r in reports {
        let state = if r.snapping {
            "snap"
        } else if r.at_rest {
            "rest"
        } else {
            "free"
        };
        let focused = match (&r.focused_level, &r.focused_label) {
            (Some(level), Some(label)) if !label.is_empty() => format!("{} ({:+})", label, level),
            (Some(level), _) => format!("{:+}", level),
            _ => "-".to_string(),
        };
        println!(
            "{:>6} {:>9.1} {:>+9.4} {:>6.3} {:>5.0}x{:<5.0}  {:<6} {}",
            r.frame, r.time_ms, r.position, r.focus_scale, r.width, r.height, state, focused
        );
    }
}

/// Source of per-frame elapsed times
enum Pacer {
    /// Every frame advances by the same step
    Fixed(Duration),
    /// Frames follow a wall-clock interval; elapsed is measured
    Realtime { interval: Interval, last: Instant },
}

impl Pacer {
    fn realtime(period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Pacer::Realtime {
            interval,
            last: Instant::now(),
        }
    }

    async fn next_elapsed(&mut self) -> Duration {
        match self {
            Pacer::Fixed(step) => *step,
            Pacer::Realtime { interval, last } => {
                interval.tick().await;
                let now = Instant::now();
                let elapsed = now.duration_since(*last);
                *last = now;
                elapsed
            }
        }
    }
}

/// Headless host for the engine: feeds script commands and collects frames
struct Simulator {
    engine: Engine,
    published: Rc<RefCell<Vec<FrameOutput>>>,
    reports: Vec<FrameReport>,
    clock: Duration,
    frames: u64,
}

impl Simulator {
    fn new(config: EngineConfig, chain: ChainSnapshot) -> Self {
        let published = Rc::new(RefCell::new(Vec::new()));
        let mut engine = Engine::new(config);
        let sink = Rc::clone(&published);
        engine.set_sink(move |output: &FrameOutput| sink.borrow_mut().push(output.clone()));
        engine.activate(chain);

        Self {
            engine,
            published,
            reports: Vec::new(),
            clock: Duration::ZERO,
            frames: 0,
        }
    }

    async fn run(&mut self, commands: &[ScriptCommand], mut pacer: Pacer) -> Vec<FrameReport> {
        // Publish the activation frame before the first command
        self.frame(&mut pacer).await;

        for command in commands {
            tracing::debug!(?command, "Script command");
            match *command {
                ScriptCommand::Scroll(delta) => self.engine.scroll(delta),
                ScriptCommand::Jump(level) => {
                    if self.engine.jump_to(level).is_none() {
                        tracing::warn!(level, "Jump ignored, carousel is inert");
                    }
                }
                ScriptCommand::Step(direction) => {
                    if self.engine.step_by(direction).is_none() {
                        tracing::info!(direction, "No reachable level in that direction");
                    }
                }
                ScriptCommand::Home => {
                    self.engine.home();
                }
                ScriptCommand::Wait(frames) => {
                    for _ in 0..frames {
                        self.frame(&mut pacer).await;
                    }
                }
                ScriptCommand::Settle => self.settle(&mut pacer).await,
            }
        }

        std::mem::take(&mut self.reports)
    }

    async fn settle(&mut self, pacer: &mut Pacer) {
        for _ in 0..MAX_SETTLE_FRAMES {
            if !self.engine.wants_frame() {
                return;
            }
            self.frame(pacer).await;
        }
        tracing::warn!(frames = MAX_SETTLE_FRAMES, "Carousel did not settle");
    }

    /// Advance the clock by one frame and record whatever the sink received
    async fn frame(&mut self, pacer: &mut Pacer) {
        let elapsed = pacer.next_elapsed().await;
        self.clock += elapsed;
        self.frames += 1;
        self.engine.tick(elapsed);

        let published: Vec<FrameOutput> = self.published.borrow_mut().drain(..).collect();
        for output in published {
            self.reports.push(FrameReport {
                frame: self.frames,
                time_ms: self.clock.as_secs_f64() * 1000.0,
                position: output.position,
                focus_scale: output.focus_scale,
                width: output.blended_size.width,
                height: output.blended_size.height,
                focused_level: output.focused.as_ref().map(|item| item.level),
                focused_label: output.focused.map(|item| item.label),
                snapping: output.snapping,
                at_rest: output.at_rest,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::demo_chain;

    const STEP: Duration = Duration::from_micros(16_667);

    fn simulator() -> Simulator {
        Simulator::new(EngineConfig::default(), demo_chain())
    }

    async fn replay(script: &str, pacer: Pacer) -> Vec<FrameReport> {
        let commands = ScriptCommand::parse_script(script).unwrap();
        simulator().run(&commands, pacer).await
    }

    #[tokio::test]
    async fn test_activation_frame_only() {
        let reports = replay("wait 5", Pacer::Fixed(STEP)).await;
        // The activation frame settles immediately; idle frames publish nothing
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].position, 0.0);
        assert_eq!(reports[0].focused_label.as_deref(), Some("Dog"));
        assert!(reports[0].at_rest);
    }

    #[tokio::test]
    async fn test_step_settles_on_next_level() {
        let reports = replay("step 1\nsettle", Pacer::Fixed(STEP)).await;
        let last = reports.last().unwrap();
        assert_eq!(last.position, 1.0);
        assert_eq!(last.focused_level, Some(1));
        assert!(last.at_rest);
        assert!(reports.iter().any(|r| r.snapping));
    }

    #[tokio::test]
    async fn test_step_skips_unreachable_level() {
        let reports = replay("jump 2\nsettle\nstep +1\nsettle", Pacer::Fixed(STEP)).await;
        assert_eq!(reports.last().unwrap().focused_level, Some(4));
    }

    #[tokio::test]
    async fn test_scroll_settles_on_a_level() {
        let reports = replay("scroll 20\nsettle", Pacer::Fixed(STEP)).await;
        let last = reports.last().unwrap();
        assert!(last.at_rest);
        assert!(!last.snapping);
        assert_eq!(last.position, last.position.round());
        assert!(last.position > 0.0);
    }

    #[tokio::test]
    async fn test_frames_and_clock_advance() {
        let reports = replay("step 1\nwait 3", Pacer::Fixed(STEP)).await;
        let frames: Vec<u64> = reports.iter().map(|r| r.frame).collect();
        assert_eq!(frames, vec![1, 2, 3, 4]);
        assert!((reports[3].time_ms - 4.0 * 16.667).abs() < 1e-6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_realtime_pacing_converges() {
        let reports = replay("jump -2\nsettle", Pacer::realtime(STEP)).await;
        let last = reports.last().unwrap();
        assert_eq!(last.position, -1.95);
        assert!(last.at_rest);
        assert!(reports.len() > 2);
        // Paused time auto-advances one period per frame after the first tick
        assert!(last.time_ms >= (reports.len() as f64 - 2.0) * 16.0);
    }

    #[test]
    fn test_report_serializes() {
        let report = FrameReport {
            frame: 1,
            time_ms: 16.0,
            position: 0.5,
            focus_scale: 0.85,
            width: 200.0,
            height: 140.0,
            focused_level: Some(1),
            focused_label: Some("Canine".into()),
            snapping: true,
            at_rest: false,
        };
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["focused_label"], "Canine");
        assert_eq!(json["snapping"], true);
    }
}
