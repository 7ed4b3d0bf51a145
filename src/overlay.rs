//! Overlay (modal) host
//!
//! Renders transient content above the normal layout at a designated mount
//! point instead of inside the view tree. The shell registers mount points
//! each frame; a missing mount point is logged and the overlay draws nothing.
//!
//! Dismissal: `Esc`, or a left click outside the content panel.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use crate::tui::Palette;

/// Mount point the shell reserves for overlays
pub const OVERLAY_ROOT: &str = "overlay-root";

const MAX_WIDTH: u16 = 64;

/// Named screen regions registered by the shell layout
#[derive(Debug, Clone, Default)]
pub struct MountPoints {
    regions: HashMap<&'static str, Rect>,
}

impl MountPoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &'static str, area: Rect) {
        self.regions.insert(name, area);
    }

    pub fn get(&self, name: &str) -> Option<Rect> {
        self.regions.get(name).copied()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }
}

pub struct OverlayHost {
    open: bool,
    on_close: Box<dyn FnMut() + Send>,
    title: String,
    body: Vec<String>,
    /// Panel drawn by the last render, used for click hit-testing
    content_area: Option<Rect>,
    /// Avoid logging the missing mount point on every frame
    reported_missing: bool,
}

impl OverlayHost {
    pub fn new(on_close: impl FnMut() + Send + 'static) -> Self {
        Self {
            open: false,
            on_close: Box::new(on_close),
            title: String::new(),
            body: Vec::new(),
            content_area: None,
            reported_missing: false,
        }
    }

    pub fn with_content(mut self, title: impl Into<String>, body: Vec<String>) -> Self {
        self.title = title.into();
        self.body = body;
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
        if !open {
            self.content_area = None;
        }
    }

    /// Last rendered content panel, if any
    pub fn content_area(&self) -> Option<Rect> {
        self.content_area
    }

    /// Returns true when the key dismissed the overlay
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.open && key.code == KeyCode::Esc {
            (self.on_close)();
            return true;
        }
        false
    }

    /// Returns true when the click dismissed the overlay
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return false;
        }
        self.handle_click(mouse.column, mouse.row)
    }

    pub fn handle_click(&mut self, column: u16, row: u16) -> bool {
        if !self.open {
            return false;
        }
        let Some(panel) = self.content_area else {
            return false;
        };
        if panel.contains(Position::new(column, row)) {
            return false;
        }
        (self.on_close)();
        true
    }

    pub fn render(&mut self, buf: &mut Buffer, mounts: &MountPoints, palette: &Palette) {
        if !self.open {
            return;
        }

        let Some(root) = mounts.get(OVERLAY_ROOT) else {
            if !self.reported_missing {
                tracing::error!(
                    mount = OVERLAY_ROOT,
                    "The overlay mount point was not found; overlay not rendered"
                );
                self.reported_missing = true;
            }
            self.content_area = None;
            return;
        };
        self.reported_missing = false;

        let panel = centered(root, u16::try_from(self.body.len()).unwrap_or(u16::MAX));
        self.content_area = Some(panel);

        // Backdrop
        buf.set_style(root, Style::default().add_modifier(Modifier::DIM));
        Clear.render(panel, buf);

        let mut lines: Vec<Line> = self
            .body
            .iter()
            .map(|l| Line::from(Span::styled(l.as_str(), palette.text())))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("[Esc] close", palette.dimmed())));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(palette.accent())
            .style(Style::default().bg(palette.surface))
            .title(Span::styled(format!(" {} ", self.title), palette.header()));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(panel, buf);
    }
}

/// Panel centered in `root`, sized for `body_lines` of wrapped text
fn centered(root: Rect, body_lines: u16) -> Rect {
    let width = root.width.min(MAX_WIDTH);
    // body + blank + hint + borders, with room for wrapping
    let height = root.height.min(body_lines.saturating_mul(2).saturating_add(4));
    Rect::new(
        root.x + (root.width - width) / 2,
        root.y + (root.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn host() -> (OverlayHost, Arc<AtomicUsize>) {
        let closes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&closes);
        let host = OverlayHost::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .with_content("About", vec!["Hello".to_string()]);
        (host, closes)
    }

    fn mounts(area: Rect) -> MountPoints {
        let mut mounts = MountPoints::new();
        mounts.register(OVERLAY_ROOT, area);
        mounts
    }

    #[test]
    fn test_closed_overlay_renders_nothing() {
        let (mut host, _) = host();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        host.render(&mut buf, &mounts(area), &Palette::dark());
        assert_eq!(buf, Buffer::empty(area));
    }

    #[test]
    fn test_missing_mount_point_is_soft_failure() {
        let (mut host, closes) = host();
        host.set_open(true);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);

        host.render(&mut buf, &MountPoints::new(), &Palette::dark());

        assert_eq!(buf, Buffer::empty(area));
        assert!(host.content_area().is_none());
        // Nothing rendered, so nothing to click outside of
        assert!(!host.handle_click(0, 0));
        assert_eq!(closes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_click_inside_keeps_outside_dismisses() {
        let (mut host, closes) = host();
        host.set_open(true);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        host.render(&mut buf, &mounts(area), &Palette::dark());

        let panel = host.content_area().unwrap();
        assert!(!host.handle_click(panel.x + 1, panel.y + 1));
        assert_eq!(closes.load(Ordering::SeqCst), 0);

        assert!(host.handle_click(0, 0));
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_escape_dismisses_only_when_open() {
        let (mut host, closes) = host();
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);

        assert!(!host.handle_key(esc));
        host.set_open(true);
        assert!(host.handle_key(esc));
        assert!(!host.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_centered_fits_small_root() {
        let root = Rect::new(0, 0, 20, 5);
        let panel = centered(root, 10);
        assert!(panel.width <= root.width && panel.height <= root.height);
    }

    #[test]
    fn test_huge_body_is_clamped_to_root() {
        let body = (0..40_000).map(|i| format!("line {}", i)).collect();
        let mut host = OverlayHost::new(|| {}).with_content("About", body);
        host.set_open(true);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);

        host.render(&mut buf, &mounts(area), &Palette::dark());

        let panel = host.content_area().unwrap();
        assert_eq!(panel.height, area.height);
        assert!(panel.width <= MAX_WIDTH);
    }

    #[test]
    fn test_centered_saturates_line_count() {
        let root = Rect::new(0, 0, 80, 24);
        assert_eq!(centered(root, u16::MAX).height, 24);
    }
}
