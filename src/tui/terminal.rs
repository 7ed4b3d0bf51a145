//! Terminal session guard
//!
//! Owns the ratatui terminal for the lifetime of the shell. Raw mode, the
//! alternate screen and mouse capture are undone on [`TerminalSession::close`]
//! or, if the shell unwinds, when the session is dropped.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

type RestoreHook = Box<dyn FnOnce() + Send>;

pub struct TerminalSession<W: Write = Stdout> {
    terminal: Terminal<CrosstermBackend<W>>,
    restore_hook: Option<RestoreHook>,
    closed: bool,
}

impl TerminalSession<Stdout> {
    /// Enter raw mode and the alternate screen on stdout
    ///
    /// While the session lives, panics are logged instead of printed so that
    /// supervised view panics do not corrupt the screen.
    pub fn enter() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
                let _ = disable_raw_mode();
                return Err(e.into());
            }
        };

        let mut session = Self::from_terminal(terminal);
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(|info| {
            tracing::error!(panic = %info, "panic in TUI");
        }));
        session.restore_hook = Some(Box::new(move || {
            let _ = std::panic::take_hook();
            std::panic::set_hook(previous);
        }));
        Ok(session)
    }
}

impl<W: Write> TerminalSession<W> {
    /// Session over an arbitrary writer with a fixed viewport
    ///
    /// Raw mode is not entered and the panic hook is left alone.
    #[cfg(test)]
    pub fn with_writer(writer: W, area: ratatui::layout::Rect) -> anyhow::Result<Self> {
        let terminal = Terminal::with_options(
            CrosstermBackend::new(writer),
            ratatui::TerminalOptions {
                viewport: ratatui::Viewport::Fixed(area),
            },
        )?;
        Ok(Self::from_terminal(terminal))
    }

    fn from_terminal(terminal: Terminal<CrosstermBackend<W>>) -> Self {
        Self {
            terminal,
            restore_hook: None,
            closed: false,
        }
    }

    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<W>> {
        &mut self.terminal
    }

    /// Restore the terminal, reporting the first error
    pub fn close(mut self) -> anyhow::Result<()> {
        self.reinstall_hook();
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        self.closed = true;
        Ok(())
    }

    fn reinstall_hook(&mut self) {
        // set_hook panics on a panicking thread; the process is unwinding anyway
        if std::thread::panicking() {
            return;
        }
        if let Some(restore) = self.restore_hook.take() {
            restore();
        }
    }

    fn best_effort_cleanup(&mut self) {
        let backend = self.terminal.backend_mut();
        let _ = execute!(backend, DisableMouseCapture);
        let _ = execute!(backend, Show);
        let _ = execute!(backend, LeaveAlternateScreen);
        let _ = disable_raw_mode();
        let _ = backend.flush();
    }
}

impl<W: Write> Drop for TerminalSession<W> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.reinstall_hook();
        self.best_effort_cleanup();
        if std::thread::panicking() {
            eprintln!("fusion: the shell panicked; the terminal was restored and details are in the log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedWriter(Arc<Mutex<Vec<u8>>>);

    impl SharedWriter {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    const LEAVE_ALTERNATE_SCREEN: &str = "\x1b[?1049l";
    const SHOW_CURSOR: &str = "\x1b[?25h";

    #[test]
    fn test_unwinding_restores_terminal() {
        let writer = SharedWriter::default();
        let session = TerminalSession::with_writer(writer.clone(), Rect::new(0, 0, 80, 24)).unwrap();

        let outcome = catch_unwind(AssertUnwindSafe(move || {
            let _session = session;
            panic!("header render blew up");
        }));

        assert!(outcome.is_err());
        let written = writer.contents();
        assert!(written.contains(LEAVE_ALTERNATE_SCREEN));
        assert!(written.contains(SHOW_CURSOR));
    }

    #[test]
    fn test_close_restores_once() {
        let writer = SharedWriter::default();
        let session = TerminalSession::with_writer(writer.clone(), Rect::new(0, 0, 80, 24)).unwrap();

        session.close().unwrap();

        let written = writer.contents();
        assert_eq!(written.matches(LEAVE_ALTERNATE_SCREEN).count(), 1);
    }
}
