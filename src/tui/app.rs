//! TUI Application - shell layout and run loop
//!
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────┐
//! │ sidebar      │ header (label + description)                 │
//! │  nav items   ├──────────────────────────────────────────────┤
//! │              │ content: supervised, loader-driven view      │
//! │  About       │                                              │
//! │  Theme       ├──────────────────────────────────────────────┤
//! │              │ footer (key help)                            │
//! └──────────────┴──────────────────────────────────────────────┘
//!          overlay-root = whole screen, overlays drawn last
//! ```

use std::io::Stdout;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Terminal,
};
use tokio::sync::broadcast::{self, error::TryRecvError};

use super::events::{handle_key_event, poll_event, Action};
use super::terminal::TerminalSession;
use super::theme::{icons, Palette};
use super::widgets;
use crate::config::FusionConfig;
use crate::error::FusionError;
use crate::loader::{LoadStatus, ViewLoader};
use crate::nav::{Navigator, NAV_ITEMS};
use crate::overlay::{MountPoints, OverlayHost, OVERLAY_ROOT};
use crate::provider::create_provider;
use crate::supervisor::{Supervised, Supervisor};
use crate::theme::{ThemeStore, ThemeValue};
use crate::views::{AppResolver, View, ViewContext, ViewModule};

const SIDEBAR_WIDTH: u16 = 24;

const ABOUT_TITLE: &str = "About Project Fusion";

fn about_body() -> Vec<String> {
    vec![
        "A showcase of a terminal application shell built on an async operation layer.".to_string(),
        "Features demonstrated: navigation, a global theme store, task runners, \
         lazily loaded views, failure supervision and overlays."
            .to_string(),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SidebarTarget {
    View(&'static str),
    About,
    Theme,
}

// ─────────────────────────────────────────────────────────────────────────────
// Shell
// ─────────────────────────────────────────────────────────────────────────────

/// Terminal-independent shell: input handling and rendering into a buffer
pub struct Shell {
    nav: Navigator,
    loader: ViewLoader<dyn ViewModule>,
    mounted: Option<(&'static str, Box<dyn View>)>,
    supervisor: Supervisor,
    themes: &'static ThemeStore,
    theme_rx: broadcast::Receiver<ThemeValue>,
    palette: Palette,
    overlay: OverlayHost,
    overlay_closed: Arc<AtomicBool>,
    mounts: MountPoints,
    hits: Vec<(Rect, SidebarTarget)>,
    tick: u64,
    should_quit: bool,
}

impl Shell {
    pub fn new(
        loader: ViewLoader<dyn ViewModule>,
        themes: &'static ThemeStore,
        initial_path: &str,
    ) -> Self {
        let overlay_closed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&overlay_closed);
        let overlay = OverlayHost::new(move || flag.store(true, Ordering::SeqCst))
            .with_content(ABOUT_TITLE, about_body());

        Self {
            nav: Navigator::new(initial_path),
            loader,
            mounted: None,
            supervisor: Supervisor::new("content"),
            theme_rx: themes.subscribe(),
            palette: Palette::for_theme(themes.current()),
            themes,
            overlay,
            overlay_closed,
            mounts: MountPoints::new(),
            hits: Vec::new(),
            tick: 0,
            should_quit: false,
        }
    }

    pub fn current_path(&self) -> &'static str {
        self.nav.current().path
    }

    pub fn navigate(&mut self, path: &str) {
        self.nav.navigate(path);
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    pub fn overlay(&self) -> &OverlayHost {
        &self.overlay
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Path of the currently mounted view, if any
    pub fn mounted_path(&self) -> Option<&'static str> {
        self.mounted.as_ref().map(|(path, _)| *path)
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                self.handle_key(key);
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let action = handle_key_event(key, self.overlay.is_open());
        match action {
            Action::Quit => self.should_quit = true,
            Action::NextView => {
                self.nav.next();
            }
            Action::PrevView => {
                self.nav.prev();
            }
            Action::ToggleTheme => {
                self.themes.toggle();
            }
            Action::OpenAbout => self.overlay.set_open(true),
            Action::CloseOverlay => {
                self.overlay.handle_key(key);
                self.apply_overlay_close();
            }
            Action::Retry => self.retry(),
            Action::Forward => {
                if !self.supervisor.is_failed() {
                    if let Some((_, view)) = self.mounted.as_mut() {
                        view.handle_key(key);
                    }
                }
            }
            Action::None => {}
        }
        action
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.overlay.is_open() {
            self.overlay.handle_mouse(mouse);
            self.apply_overlay_close();
            return;
        }
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        let pos = Position::new(mouse.column, mouse.row);
        let target = self
            .hits
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, target)| *target);

        match target {
            Some(SidebarTarget::View(path)) => self.navigate(path),
            Some(SidebarTarget::About) => self.overlay.set_open(true),
            Some(SidebarTarget::Theme) => {
                self.themes.toggle();
            }
            None => {}
        }
    }

    /// Clear the supervised region's failure and remount on the next frame
    pub fn retry(&mut self) {
        self.supervisor.retry();
        self.mounted = None;
    }

    fn apply_overlay_close(&mut self) {
        if self.overlay_closed.swap(false, Ordering::SeqCst) {
            self.overlay.set_open(false);
        }
    }

    fn sync_theme(&mut self) {
        loop {
            match self.theme_rx.try_recv() {
                Ok(theme) => self.palette = Palette::for_theme(theme),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "theme subscriber lagged");
                    self.palette = Palette::for_theme(self.themes.current());
                }
                Err(_) => break,
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        self.tick = self.tick.wrapping_add(1);
        self.sync_theme();

        buf.set_style(area, self.palette.base());
        self.mounts.clear();
        self.mounts.register(OVERLAY_ROOT, area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(5),    // Content
                Constraint::Length(1), // Footer
            ])
            .split(columns[1]);

        self.render_sidebar(columns[0], buf);
        self.render_header(rows[0], buf);
        self.render_content(rows[1], buf);
        self.render_footer(rows[2], buf);

        let palette = self.palette;
        self.overlay.render(buf, &self.mounts, &palette);
    }

    fn render_sidebar(&mut self, area: Rect, buf: &mut Buffer) {
        let palette = self.palette;
        let block = Block::default()
            .borders(Borders::RIGHT)
            .border_style(palette.border());
        let inner = block.inner(area);
        block.render(area, buf);
        self.hits.clear();

        if inner.height == 0 {
            return;
        }
        Paragraph::new(Line::from(Span::styled(" Project Fusion", palette.header())))
            .render(Rect::new(inner.x, inner.y, inner.width, 1), buf);

        let active = self.nav.index();
        for (i, item) in NAV_ITEMS.iter().enumerate() {
            let y = inner.y + 2 + i as u16;
            if y >= inner.bottom() {
                break;
            }
            let row = Rect::new(inner.x, y, inner.width, 1);
            let style = if i == active {
                palette.selected()
            } else {
                palette.dimmed()
            };
            Paragraph::new(format!(" {} {}", item.icon, item.label))
                .style(style)
                .render(row, buf);
            self.hits.push((row, SidebarTarget::View(item.path)));
        }

        let (theme_icon, theme_label) = if palette.theme.is_dark() {
            (icons::SUN, "Light Mode")
        } else {
            (icons::MOON, "Dark Mode")
        };
        let footer = [
            (format!(" {} About", icons::INFO), SidebarTarget::About),
            (format!(" {} {}", theme_icon, theme_label), SidebarTarget::Theme),
        ];
        let first_y = inner.bottom().saturating_sub(footer.len() as u16);
        // Skip when the nav list already fills the sidebar
        if first_y < inner.y + 2 + NAV_ITEMS.len() as u16 {
            return;
        }
        for (offset, (label, target)) in footer.into_iter().enumerate() {
            let row = Rect::new(inner.x, first_y + offset as u16, inner.width, 1);
            Paragraph::new(label).style(palette.dimmed()).render(row, buf);
            self.hits.push((row, target));
        }
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let palette = self.palette;
        let current = self.nav.current();
        let lines = vec![
            Line::from(Span::styled(current.label, palette.header())),
            Line::from(Span::styled(current.description, palette.dimmed())),
        ];
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(palette.border()),
            )
            .render(area, buf);
    }

    fn render_content(&mut self, area: Rect, buf: &mut Buffer) {
        let palette = self.palette;
        let ctx = ViewContext {
            palette: &palette,
            tick: self.tick,
        };
        let path = self.nav.current().path;

        let mut scratch = Buffer::empty(area);
        scratch.set_style(area, palette.base());

        let loader = &self.loader;
        let mounted = &mut self.mounted;
        let outcome = self
            .supervisor
            .supervise(|| mount_and_render(loader, mounted, path, area, &mut scratch, &ctx));

        match outcome {
            Supervised::Rendered(()) => buf.merge(&scratch),
            Supervised::Fallback => {
                self.mounted = None;
                widgets::render_fallback(area, buf, &palette);
            }
        }
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        let palette = self.palette;
        let keys = [
            ("[Tab]", " views  "),
            ("[Ctrl+T]", " theme  "),
            ("[F1]", " about  "),
            ("[Ctrl+R]", " retry  "),
            ("[Ctrl+Q]", " quit"),
        ];
        let spans: Vec<Span> = keys
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(*key, palette.accent()),
                    Span::styled(*label, palette.dimmed()),
                ]
            })
            .collect();
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

/// Mount the view for `path` if needed and render it
///
/// Shows the shared loading placeholder while the module resolves; a failed
/// resolution is returned as an error for the supervisor to catch.
fn mount_and_render(
    loader: &ViewLoader<dyn ViewModule>,
    mounted: &mut Option<(&'static str, Box<dyn View>)>,
    path: &'static str,
    area: Rect,
    buf: &mut Buffer,
    ctx: &ViewContext,
) -> Result<(), FusionError> {
    let module = match loader.poll(path) {
        LoadStatus::Pending => {
            widgets::render_loading(area, buf, ctx.palette, ctx.tick);
            return Ok(());
        }
        LoadStatus::Failed(error) => return Err(error),
        LoadStatus::Ready(module) => module,
    };

    if !matches!(mounted, Some((current, _)) if *current == path) {
        tracing::debug!(path, "mounting view");
        *mounted = Some((path, module.mount()));
    }

    match mounted {
        Some((_, view)) => view.render(area, buf, ctx),
        None => Ok(()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Terminal application
// ─────────────────────────────────────────────────────────────────────────────

/// TUI Application
pub struct TuiApp {
    shell: Shell,
}

impl TuiApp {
    /// Create a new TUI application
    pub fn new(config: &FusionConfig, initial_path: Option<&str>) -> anyhow::Result<Self> {
        let provider = create_provider(&config.provider, config)?;
        let resolver = AppResolver::new(provider).with_load_delay(config.load_delay);
        let loader: ViewLoader<dyn ViewModule> = ViewLoader::new(resolver);
        let shell = Shell::new(
            loader,
            ThemeStore::global(),
            initial_path.unwrap_or(crate::nav::DEFAULT_PATH),
        );
        Ok(Self { shell })
    }

    /// Run the TUI application
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut session = TerminalSession::enter()?;

        tracing::info!(path = self.shell.current_path(), "TUI started");
        let result = self.main_loop(session.terminal()).await;

        session.close()?;
        tracing::info!("TUI stopped");

        result
    }

    /// Main event loop
    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        let tick_rate = Duration::from_millis(16); // ~60fps

        loop {
            terminal.draw(|frame| {
                let area = frame.area();
                self.shell.render(area, frame.buffer_mut());
            })?;

            if let Some(event) = poll_event(tick_rate)? {
                self.shell.handle_event(event);
            }

            if self.shell.should_quit() {
                break;
            }

            // Let runner and loader tasks progress between frames
            tokio::task::yield_now().await;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockProvider;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn shell(path: &str) -> Shell {
        let store: &'static ThemeStore = Box::leak(Box::new(ThemeStore::new()));
        let loader = ViewLoader::new(AppResolver::new(Arc::new(MockProvider::new())));
        Shell::new(loader, store, path)
    }

    async fn settle(shell: &mut Shell, area: Rect, buf: &mut Buffer) {
        for _ in 0..5 {
            shell.render(area, buf);
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_unknown_initial_path_falls_back_to_dashboard() {
        let mut shell = shell("/nope");
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        settle(&mut shell, area, &mut buf).await;

        assert_eq!(shell.current_path(), "/");
        assert_eq!(shell.mounted_path(), Some("/"));
        assert!(widgets::utils::buffer_text(&buf).contains("Task Manager"));
    }

    #[tokio::test]
    async fn test_sidebar_click_navigates() {
        let mut shell = shell("/");
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        shell.render(area, &mut buf);

        // Sidebar rows start two lines below the title; Blog is the fourth item
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 2,
            row: 2 + 3,
            modifiers: KeyModifiers::NONE,
        };
        shell.handle_mouse(click);
        assert_eq!(shell.current_path(), "/blog");
    }

    #[tokio::test]
    async fn test_f1_opens_and_escape_closes_about() {
        let mut shell = shell("/");
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);

        shell.handle_key(KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE));
        assert!(shell.overlay().is_open());
        shell.render(area, &mut buf);
        assert!(widgets::utils::buffer_text(&buf).contains(ABOUT_TITLE));

        shell.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!shell.overlay().is_open());
    }

    #[tokio::test]
    async fn test_theme_toggle_reaches_palette() {
        let mut shell = shell("/");
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        assert!(shell.palette().theme.is_dark());

        shell.handle_key(KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL));
        shell.render(area, &mut buf);
        assert_eq!(shell.palette().theme, ThemeValue::Light);
    }
}
