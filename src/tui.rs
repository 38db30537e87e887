//! Terminal lifecycle management.
//!
//! Handles entering/leaving the alternate screen, raw mode and focus
//! reporting, and installs a panic hook that restores the terminal before
//! printing the backtrace.

use std::io::{stdout, Stdout};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

/// Convenience alias.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enter the alternate screen, enable raw mode and focus events, and install
/// the panic hook.
pub fn init() -> Result<Tui> {
    execute!(stdout(), EnterAlternateScreen, EnableFocusChange)
        .wrap_err("Failed to enter the alternate screen")?;
    enable_raw_mode().wrap_err("Failed to enable raw mode")?;
    install_panic_hook();
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Leave the alternate screen and disable raw mode.
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), DisableFocusChange, LeaveAlternateScreen)?;
    Ok(())
}

/// Restore the terminal *before* printing the default panic message, so a
/// panic doesn't leave the shell in raw mode.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort restore; we're already panicking.
        let _ = restore();
        original_hook(panic_info);
    }));
}
