use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::App;
use crate::error::Result;
use crate::fs::vault::VaultStore;
use crate::ui;

/// The terminal session `vp` runs in: raw mode, alternate screen and,
/// when enabled, mouse capture. Dropping it puts the terminal back.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    mouse: bool,
    active: bool,
}

impl Tui {
    pub fn enter(mouse: bool) -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        if mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        tracing::debug!(mouse, "terminal session started");
        Ok(Self {
            terminal,
            mouse,
            active: true,
        })
    }

    /// Draw one frame of the app.
    pub fn draw<V: VaultStore>(&mut self, app: &mut App<V>) -> Result<()> {
        self.terminal.draw(|frame| ui::render(app, frame))?;
        Ok(())
    }

    /// Leave the session. Later calls do nothing.
    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        terminal::disable_raw_mode()?;
        leave_screen(self.terminal.backend_mut(), self.mouse)?;
        tracing::debug!("terminal session ended");
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::warn!(error = %e, "failed to restore terminal");
        }
    }
}

/// Undo everything `Tui::enter` wrote to the screen.
fn leave_screen<W: Write>(out: &mut W, mouse: bool) -> io::Result<()> {
    if mouse {
        execute!(out, DisableMouseCapture)?;
    }
    execute!(out, LeaveAlternateScreen, Show)
}

/// Put the terminal back before the default panic report is printed, and
/// record the panic in the log file.
pub fn install_panic_hook(mouse: bool) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "vp panicked");
        if let Err(e) = terminal::disable_raw_mode() {
            tracing::warn!(error = %e, "failed to leave raw mode after panic");
        }
        if let Err(e) = leave_screen(&mut io::stdout(), mouse) {
            tracing::warn!(error = %e, "failed to leave alternate screen after panic");
        }
        default_hook(info);
    }));
}
