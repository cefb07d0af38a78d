//! Scripted input sessions for the headless simulator.
//!
//! One command per line; blank lines and `#` comments are ignored:
//!
//! ```text
//! scroll 120      # raw wheel delta
//! wait 10         # advance ten frames
//! jump -2         # explicit jump to a level
//! step +1         # move to the next reachable level
//! home
//! settle          # run frames until the carousel is at rest
//! ```

use std::path::Path;
use std::str::FromStr;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Scroll(f64),
    Jump(i32),
    Step(i32),
    Home,
    Wait(u32),
    Settle,
}

impl ScriptCommand {
    /// Parse a whole script
    pub fn parse_script(content: &str) -> Result<Vec<ScriptCommand>> {
        content
            .lines()
            .enumerate()
            .filter_map(|(idx, raw)| {
                let line = raw.split('#').next().unwrap_or("").trim();
                if line.is_empty() {
                    None
                } else {
                    Some(Self::parse_line(line).map_err(|message| Error::Script {
                        line: idx + 1,
                        message,
                    }))
                }
            })
            .collect()
    }

    pub fn load(path: &Path) -> Result<Vec<ScriptCommand>> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_script(&content)
    }

    fn parse_line(line: &str) -> std::result::Result<ScriptCommand, String> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default();
        let arg = parts.next();
        if let Some(extra) = parts.next() {
            return Err(format!("unexpected argument '{}'", extra));
        }

        match (verb, arg) {
            ("scroll", Some(v)) => {
                let delta = parse_arg::<f64>(v)?;
                if !delta.is_finite() {
                    return Err(format!("scroll delta must be finite, got '{}'", v));
                }
                Ok(ScriptCommand::Scroll(delta))
            }
            ("jump", Some(v)) => Ok(ScriptCommand::Jump(parse_arg(v)?)),
            ("step", Some(v)) => match parse_arg::<i32>(v)? {
                0 => Err("step direction must be non-zero".to_string()),
                dir => Ok(ScriptCommand::Step(dir.signum())),
            },
            ("wait", Some(v)) => Ok(ScriptCommand::Wait(parse_arg(v)?)),
            ("home", None) => Ok(ScriptCommand::Home),
            ("settle", None) => Ok(ScriptCommand::Settle),
            ("home" | "settle", Some(v)) => Err(format!("'{}' takes no argument, got '{}'", verb, v)),
            ("scroll" | "jump" | "step" | "wait", None) => {
                Err(format!("'{}' requires an argument", verb))
            }
            _ => Err(format!("unknown command '{}'", verb)),
        }
    }
}

fn parse_arg<T: FromStr>(value: &str) -> std::result::Result<T, String> {
    // Accept an explicit plus sign ("+1") for readability
    let value = value.strip_prefix('+').unwrap_or(value);
    value
        .parse()
        .map_err(|_| format!("invalid argument '{}'", value))
}
