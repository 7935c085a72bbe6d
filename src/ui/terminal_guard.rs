//! Restores the terminal when the dashboard exits, errors or panics.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// RAII guard holding the terminal in raw mode on the alternate screen.
///
/// Cleanup runs on drop, so early `?` returns leave a usable shell behind.
/// Panics are covered separately by [`install_panic_hook`].
pub struct TerminalGuard {
    active: AtomicBool,
}

impl TerminalGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self {
            active: AtomicBool::new(true),
        })
    }

    /// Best-effort restore; safe to call more than once.
    pub fn cleanup() {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        let _ = io::stdout().flush();
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.active.swap(false, Ordering::SeqCst) {
            Self::cleanup();
        }
    }
}

/// Restore the terminal before the default hook prints the panic.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        TerminalGuard::cleanup();
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_guard_skips_cleanup() {
        let guard = TerminalGuard {
            active: AtomicBool::new(false),
        };
        assert!(!guard.active.load(Ordering::SeqCst));
        drop(guard);
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        // Terminal ops fail without a tty but must not panic
        TerminalGuard::cleanup();
        TerminalGuard::cleanup();
    }
}
