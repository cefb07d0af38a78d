use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Chain document loaded when none is given on the command line
    #[serde(default)]
    pub chain_file: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_dir: default_data_dir(),
            chain_file: None,
        }
    }
}

/// Free-motion and snapping constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Velocity retained per reference frame while coasting
    #[serde(default = "default_damping")]
    pub damping: f64,
    /// Below this speed free motion settles and snapping begins
    #[serde(default = "default_min_velocity")]
    pub min_velocity: f64,
    /// Fraction of the remaining distance covered per reference frame while snapping
    #[serde(default = "default_spring")]
    pub spring: f64,
    /// Distance under which snapping lands exactly on target
    #[serde(default = "default_arrive_epsilon")]
    pub arrive_epsilon: f64,
    /// Neighbour within this distance is taken unconditionally
    #[serde(default = "default_stuck_threshold")]
    pub stuck_threshold: f64,
    /// Neighbour within this distance is preferred over velocity direction
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold: f64,
    /// Range used when the chain has no reachable items
    #[serde(default = "default_fallback_range")]
    pub fallback_range: f64,
    /// Overscroll allowed around a single reachable item
    #[serde(default = "default_single_item_margin")]
    pub single_item_margin: f64,
    /// Inward buffer applied to both ends of a multi-item range
    #[serde(default = "default_edge_buffer")]
    pub edge_buffer: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            min_velocity: default_min_velocity(),
            spring: default_spring(),
            arrive_epsilon: default_arrive_epsilon(),
            stuck_threshold: default_stuck_threshold(),
            snap_threshold: default_snap_threshold(),
            fallback_range: default_fallback_range(),
            single_item_margin: default_single_item_margin(),
            edge_buffer: default_edge_buffer(),
        }
    }
}

/// Adaptive input sensitivity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Number of recent speed samples kept for continuous-scroll detection
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Samples averaged when classifying continuous scrolling
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Average speed above which input counts as continuous scrolling
    #[serde(default = "default_continuous_threshold")]
    pub continuous_threshold: f64,
    /// Gain applied while scrolling continuously
    #[serde(default = "default_continuous_gain")]
    pub continuous_gain: f64,
    /// Gain applied to isolated or slow input
    #[serde(default = "default_precision_gain")]
    pub precision_gain: f64,
    /// Raw-delta magnitude tiers, ascending: (upper bound, multiplier)
    #[serde(default = "default_boost_tiers")]
    pub boost_tiers: Vec<BoostTier>,
    /// Velocity magnitude cap
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f64,
    /// Raw delta reported for one terminal mouse wheel notch
    #[serde(default = "default_wheel_delta")]
    pub wheel_delta: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            history_window: default_history_window(),
            continuous_threshold: default_continuous_threshold(),
            continuous_gain: default_continuous_gain(),
            precision_gain: default_precision_gain(),
            boost_tiers: default_boost_tiers(),
            max_velocity: default_max_velocity(),
            wheel_delta: default_wheel_delta(),
        }
    }
}

/// Multiplier applied to raw deltas whose magnitude is below `below`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostTier {
    pub below: f64,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutAxis {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Scroll axis; item extent is measured along it
    #[serde(default)]
    pub axis: LayoutAxis,
    /// Gap between neighbouring items in pixels (negative overlaps)
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    /// Size assumed for items without a recorded size
    #[serde(default = "default_item_width")]
    pub default_width: f64,
    #[serde(default = "default_item_height")]
    pub default_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            axis: LayoutAxis::default(),
            spacing: default_spacing(),
            default_width: default_item_width(),
            default_height: default_item_height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Focus scale one level away from home
    #[serde(default = "default_focus_scale_at_one")]
    pub focus_scale_at_one: f64,
    /// Lowest focus scale
    #[serde(default = "default_focus_scale_min")]
    pub focus_scale_min: f64,
    /// Item scale lost per level of distance from the position
    #[serde(default = "default_item_scale_falloff")]
    pub item_scale_falloff: f64,
    #[serde(default = "default_item_scale_min")]
    pub item_scale_min: f64,
    /// Item opacity lost per level of distance from the position
    #[serde(default = "default_item_opacity_falloff")]
    pub item_opacity_falloff: f64,
    #[serde(default = "default_item_opacity_min")]
    pub item_opacity_min: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            focus_scale_at_one: default_focus_scale_at_one(),
            focus_scale_min: default_focus_scale_min(),
            item_scale_falloff: default_item_scale_falloff(),
            item_scale_min: default_item_scale_min(),
            item_opacity_falloff: default_item_opacity_falloff(),
            item_opacity_min: default_item_opacity_min(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Target frame rate while animating
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Frame length the physics constants are tuned for
    #[serde(default = "default_reference_frame_ms")]
    pub reference_frame_ms: f64,
    /// Frames longer than this skip physics instead of jumping
    #[serde(default = "default_max_frame_delta_ms")]
    pub max_frame_delta_ms: u64,
    /// Skip every long frame; otherwise only the first frame after arming is
    /// skipped and later long frames advance by at most `max_frame_delta_ms`
    #[serde(default)]
    pub skip_long_frames: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            reference_frame_ms: default_reference_frame_ms(),
            max_frame_delta_ms: default_max_frame_delta_ms(),
            skip_long_frames: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Poll interval in milliseconds while the carousel is at rest
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Show the item size readout in the status bar
    #[serde(default = "default_true")]
    pub show_metrics: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            show_metrics: default_true(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("strata")
}

fn default_true() -> bool {
    true
}

fn default_damping() -> f64 {
    0.92
}

fn default_min_velocity() -> f64 {
    0.004
}

fn default_spring() -> f64 {
    0.18
}

fn default_arrive_epsilon() -> f64 {
    0.01
}

fn default_stuck_threshold() -> f64 {
    0.08
}

fn default_snap_threshold() -> f64 {
    0.45
}

fn default_fallback_range() -> f64 {
    6.0
}

fn default_single_item_margin() -> f64 {
    0.1
}

fn default_edge_buffer() -> f64 {
    0.05
}

fn default_history_capacity() -> usize {
    10
}

fn default_history_window() -> usize {
    3
}

fn default_continuous_threshold() -> f64 {
    0.04
}

fn default_continuous_gain() -> f64 {
    0.0018
}

fn default_precision_gain() -> f64 {
    0.0035
}

fn default_boost_tiers() -> Vec<BoostTier> {
    vec![
        BoostTier { below: 4.0, multiplier: 3.0 },
        BoostTier { below: 15.0, multiplier: 2.0 },
        BoostTier { below: 40.0, multiplier: 1.5 },
        BoostTier { below: 100.0, multiplier: 1.2 },
    ]
}

fn default_max_velocity() -> f64 {
    0.35
}

fn default_wheel_delta() -> f64 {
    40.0
}

fn default_spacing() -> f64 {
    -24.0 // slight stacking
}

fn default_item_width() -> f64 {
    200.0
}

fn default_item_height() -> f64 {
    140.0
}

fn default_focus_scale_at_one() -> f64 {
    0.7
}

fn default_focus_scale_min() -> f64 {
    0.4
}

fn default_item_scale_falloff() -> f64 {
    0.18
}

fn default_item_scale_min() -> f64 {
    0.55
}

fn default_item_opacity_falloff() -> f64 {
    0.4
}

fn default_item_opacity_min() -> f64 {
    0.15
}

fn default_fps() -> u32 {
    60
}

fn default_reference_frame_ms() -> f64 {
    1000.0 / 60.0
}

fn default_max_frame_delta_ms() -> u64 {
    100
}

fn default_tick_rate() -> u64 {
    250
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults if missing
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        let config: Self = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml_str(&content)?
        } else {
            Self::default()
        };
        Ok(config.sanitize())
    }

    /// Parse a TOML document without touching the filesystem
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml_string()?)?;

        Ok(())
    }

    pub fn to_toml_string(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/strata/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("strata")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the log file path used while the terminal UI owns the screen
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("strata.log")
    }

    /// Chain file with tilde expansion
    pub fn chain_file(&self) -> Option<PathBuf> {
        self.general.chain_file.as_deref().map(expand_tilde)
    }

    /// Repair values the engine cannot work with.
    ///
    /// Each repaired field falls back to its default and is logged.
    pub fn sanitize(mut self) -> Self {
        let p = &mut self.physics;
        repair(&mut p.damping, "physics.damping", |v| v > 0.0 && v < 1.0, default_damping());
        repair(&mut p.min_velocity, "physics.min_velocity", |v| v > 0.0, default_min_velocity());
        repair(&mut p.spring, "physics.spring", |v| v > 0.0 && v < 1.0, default_spring());
        repair(
            &mut p.arrive_epsilon,
            "physics.arrive_epsilon",
            |v| v > 0.0 && v < 0.5,
            default_arrive_epsilon(),
        );
        repair(
            &mut p.snap_threshold,
            "physics.snap_threshold",
            |v| v > 0.0 && v < 0.5,
            default_snap_threshold(),
        );
        let snap = p.snap_threshold;
        repair(
            &mut p.stuck_threshold,
            "physics.stuck_threshold",
            |v| v >= 0.0 && v <= snap,
            default_stuck_threshold().min(snap),
        );
        repair(&mut p.fallback_range, "physics.fallback_range", |v| v > 0.0, default_fallback_range());
        repair(
            &mut p.single_item_margin,
            "physics.single_item_margin",
            |v| v >= 0.0 && v < 0.5,
            default_single_item_margin(),
        );
        repair(
            &mut p.edge_buffer,
            "physics.edge_buffer",
            |v| v >= 0.0 && v < 0.5,
            default_edge_buffer(),
        );

        let i = &mut self.input;
        if i.history_capacity == 0 {
            tracing::warn!("input.history_capacity must be positive, using default");
            i.history_capacity = default_history_capacity();
        }
        if i.history_window == 0 || i.history_window > i.history_capacity {
            tracing::warn!("input.history_window out of range, using default");
            i.history_window = default_history_window().min(i.history_capacity);
        }
        repair(&mut i.max_velocity, "input.max_velocity", |v| v > 0.0, default_max_velocity());
        repair(&mut i.continuous_gain, "input.continuous_gain", |v| v >= 0.0, default_continuous_gain());
        repair(&mut i.precision_gain, "input.precision_gain", |v| v >= 0.0, default_precision_gain());
        if !i.boost_tiers.windows(2).all(|w| w[0].below < w[1].below)
            || i.boost_tiers.iter().any(|t| !t.multiplier.is_finite() || t.multiplier <= 0.0)
        {
            tracing::warn!("input.boost_tiers must ascend with positive multipliers, using default");
            i.boost_tiers = default_boost_tiers();
        }

        let l = &mut self.layout;
        repair(&mut l.default_width, "layout.default_width", |v| v >= 0.0, default_item_width());
        repair(&mut l.default_height, "layout.default_height", |v| v >= 0.0, default_item_height());
        repair(&mut l.spacing, "layout.spacing", |_| true, default_spacing());

        let f = &mut self.frame;
        if f.fps == 0 {
            tracing::warn!("frame.fps must be positive, using default");
            f.fps = default_fps();
        }
        repair(
            &mut f.reference_frame_ms,
            "frame.reference_frame_ms",
            |v| v > 0.0,
            default_reference_frame_ms(),
        );

        self
    }
}

/// Replace a non-finite or out-of-range value with its default
fn repair(value: &mut f64, name: &str, valid: impl Fn(f64) -> bool, fallback: f64) {
    if !value.is_finite() || !valid(*value) {
        tracing::warn!("Invalid {} = {}, using {}", name, value, fallback);
        *value = fallback;
    }
}
