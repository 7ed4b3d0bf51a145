//! TUI Widgets - shell chrome shared by every view
//!
//! Stateless renderers: each takes an area, a buffer and the palette.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

use super::theme::{icons, Palette};

pub const FALLBACK_TITLE: &str = "Something went wrong.";
pub const FALLBACK_BODY: &str = "An error occurred in this section of the application.";
pub const FALLBACK_ACTION: &str = "[Ctrl+R] Try Again";
pub const LOADING_LABEL: &str = "Loading...";

/// Recoverable fallback shown in place of a failed region
pub fn render_fallback(area: Rect, buf: &mut Buffer, palette: &Palette) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(FALLBACK_TITLE, palette.error())),
        Line::from(""),
        Line::from(Span::styled(FALLBACK_BODY, palette.text())),
        Line::from(""),
        Line::from(Span::styled(FALLBACK_ACTION, palette.selected())),
    ];

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.error_red))
                .style(Style::default().bg(palette.error_surface)),
        )
        .render(area, buf);
}

/// Shared placeholder while a view module resolves
pub fn render_loading(area: Rect, buf: &mut Buffer, palette: &Palette, tick: u64) {
    let spinner = icons::SPINNER[(tick / 8) as usize % icons::SPINNER.len()];
    let line = Line::from(vec![
        Span::styled(spinner, palette.accent()),
        Span::raw(" "),
        Span::styled(LOADING_LABEL, palette.dimmed()),
    ]);
    let middle = Rect::new(area.x, area.y + area.height / 2, area.width, area.height.min(1));
    Paragraph::new(line)
        .alignment(Alignment::Center)
        .render(middle, buf);
}

/// Common widget utilities
pub mod utils {
    use ratatui::buffer::Buffer;

    /// Flatten a buffer to text, one line per row
    pub fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }
}
