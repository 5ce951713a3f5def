//! Terminal setup and management
//!
//! Handles terminal initialization, restoration, and provides RAII guards
//! for safe cleanup on exit or panic.

use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    style::Print,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::prelude::*;
use std::io::{self, stdout, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Type alias for our terminal backend
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// xterm title stack: push the current window title, pop it back
const PUSH_TITLE: &str = "\x1b[22;0t";
const POP_TITLE: &str = "\x1b[23;0t";

/// Set while a title pushed by `init` is waiting to be restored
static TITLE_SAVED: AtomicBool = AtomicBool::new(false);

/// Initialize terminal for TUI mode
///
/// Sets up raw mode, alternate screen, and focus reporting. Focus changes
/// are how the poller learns the user looked away.
///
/// # Errors
/// Returns error if terminal setup fails (e.g., not a TTY).
pub fn init() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange, Print(PUSH_TITLE))?;
    TITLE_SAVED.store(true, Ordering::SeqCst);
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Restore terminal to normal state
///
/// Safe to call multiple times.
pub fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    let mut out = stdout();
    reset_title(&mut out, &TITLE_SAVED)?;
    execute!(out, LeaveAlternateScreen, DisableFocusChange)?;
    Ok(())
}

/// Drop the unread decoration and pop the title saved by `init`, once
///
/// Terminals without a title stack are left with an empty title.
fn reset_title(out: &mut impl Write, saved: &AtomicBool) -> io::Result<()> {
    if !saved.swap(false, Ordering::SeqCst) {
        return Ok(());
    }
    execute!(out, SetTitle(""), Print(POP_TITLE))
}

/// Set the terminal window title
pub fn set_title(title: &str) -> io::Result<()> {
    execute!(stdout(), SetTitle(title))
}

/// RAII guard that restores terminal state on drop
///
/// This ensures the terminal is properly restored even if the TUI panics,
/// preventing the user from being left with a broken terminal state.
pub struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_title_runs_once() {
        let saved = AtomicBool::new(true);
        let mut out = Vec::new();

        reset_title(&mut out, &saved).unwrap();
        let written = String::from_utf8(out.clone()).unwrap();
        assert!(written.contains("\x1b]0;\x07"));
        assert!(written.ends_with(POP_TITLE));

        out.clear();
        reset_title(&mut out, &saved).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_reset_title_without_init_is_silent() {
        let saved = AtomicBool::new(false);
        let mut out = Vec::new();
        reset_title(&mut out, &saved).unwrap();
        assert!(out.is_empty());
    }
}
