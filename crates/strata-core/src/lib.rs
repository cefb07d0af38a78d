pub mod chain;
pub mod config;
pub mod error;
pub mod script;

pub use chain::{ChainId, ChainItem, ChainSnapshot, ItemSize};
pub use config::{
    AppConfig, FrameConfig, InputConfig, LayoutAxis, LayoutConfig, PhysicsConfig, RenderConfig,
};
pub use error::{Error, Result};
pub use script::ScriptCommand;
