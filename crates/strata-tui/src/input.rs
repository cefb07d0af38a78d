use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Mode};

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    /// Move to the next reachable level
    StepForward,
    /// Move to the previous reachable level
    StepBack,
    /// Return to the level-0 item
    Home,
    /// Feed a raw scroll delta, as a wheel would
    Nudge(f64),
    /// Reload the chain document from disk
    Reload,
    ToggleHelp,
    ExitMode,
    None,
}

/// Raw delta for j/k nudges; small enough to get the precision boost
const NUDGE_DELTA: f64 = 12.0;

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    if app.mode == Mode::Help {
        // Any key exits help
        return Action::ExitMode;
    }

    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::Quit,

        // Level stepping
        (KeyCode::Char('l'), KeyModifiers::NONE) => Action::StepForward,
        (KeyCode::Right, _) => Action::StepForward,
        (KeyCode::Char('h'), KeyModifiers::NONE) => Action::StepBack,
        (KeyCode::Left, _) => Action::StepBack,

        // Free scrolling
        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => Action::Nudge(NUDGE_DELTA),
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => Action::Nudge(-NUDGE_DELTA),

        (KeyCode::Char('0'), KeyModifiers::NONE) | (KeyCode::Home, _) => Action::Home,
        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::Reload,
        (KeyCode::Char('?'), _) => Action::ToggleHelp,

        _ => Action::None,
    }
}
