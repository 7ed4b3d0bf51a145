//! Configurator - colored product preview plus generated marketing copy

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use super::{card, info_line, task_lines, View, ViewContext, ViewModule};
use crate::error::FusionError;
use crate::operations::{ProductConfig, ProductCopywriter};
use crate::provider::Provider;
use crate::runner::TaskRunner;

pub const SHAPE: &str = "Icosahedron";

/// Length of `#RRGGBB`
const HEX_INPUT_MAX: usize = 7;

/// Selectable product colors as (name, hex)
pub const PRODUCT_COLORS: &[(&str, &str)] = &[
    ("Deep Sky Blue", "#00BFFF"),
    ("Crimson", "#DC143C"),
    ("Gold", "#FFD700"),
    ("Lime Green", "#32CD32"),
    ("Blue Violet", "#8A2BE2"),
];

const ICOSAHEDRON: &[&str] = &[
    r"        /\        ",
    r"       /  \       ",
    r"   ___/____\___   ",
    r"   \  /\  /\  /   ",
    r"    \/  \/  \/    ",
    r"    /\  /\  /\    ",
    r"   /__\/__\/__\   ",
    r"      \    /      ",
    r"       \  /       ",
    r"        \/        ",
];

/// Parse `#RRGGBB` into a terminal color
pub fn parse_hex_color(hex: &str) -> Result<Color, FusionError> {
    let digits = hex
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.is_ascii())
        .ok_or_else(|| FusionError::Render(format!("invalid color '{}'", hex)))?;

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| FusionError::Render(format!("invalid color '{}'", hex)))
    };
    Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub struct ConfiguratorModule {
    provider: Arc<dyn Provider>,
}

impl ConfiguratorModule {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

impl ViewModule for ConfiguratorModule {
    fn mount(&self) -> Box<dyn View> {
        let runner = TaskRunner::new(ProductCopywriter::new(Arc::clone(&self.provider)));
        Box::new(ConfiguratorView::new(runner))
    }
}

pub struct ConfiguratorView {
    color_index: usize,
    /// Typed color, overrides the palette entry once applied
    custom_hex: Option<String>,
    hex_input: String,
    description: TaskRunner<ProductConfig, String>,
    requested_on_mount: bool,
}

impl ConfiguratorView {
    pub fn new(description: TaskRunner<ProductConfig, String>) -> Self {
        Self {
            color_index: 0,
            custom_hex: None,
            hex_input: String::new(),
            description,
            requested_on_mount: false,
        }
    }

    pub fn hex_input(&self) -> &str {
        &self.hex_input
    }

    /// Use the typed color; it is parsed on the next render
    ///
    /// Returns false when nothing was typed.
    pub fn apply_hex(&mut self) -> bool {
        let typed = self.hex_input.trim();
        if typed.is_empty() {
            return false;
        }
        self.custom_hex = Some(typed.to_string());
        self.hex_input.clear();
        true
    }

    pub fn description(&self) -> &TaskRunner<ProductConfig, String> {
        &self.description
    }

    pub fn color_hex(&self) -> &str {
        match &self.custom_hex {
            Some(hex) => hex,
            None => PRODUCT_COLORS[self.color_index].1,
        }
    }

    pub fn cycle_color(&mut self, forward: bool) {
        let len = PRODUCT_COLORS.len();
        self.custom_hex = None;
        self.color_index = if forward {
            (self.color_index + 1) % len
        } else {
            (self.color_index + len - 1) % len
        };
    }

    /// Request a new description for the current color
    pub fn generate(&self) -> bool {
        if self.description.state().is_pending() {
            return false;
        }
        self.description
            .spawn(ProductConfig::new(self.color_hex(), SHAPE));
        true
    }

    fn render_preview(&self, area: Rect, buf: &mut Buffer, ctx: &ViewContext) -> Result<(), FusionError> {
        let color = parse_hex_color(self.color_hex())?;
        let style = Style::default().fg(color);

        let mut lines: Vec<Line> = vec![Line::from("")];
        lines.extend(ICOSAHEDRON.iter().map(|row| Line::from(Span::styled(*row, style))));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("◀ ", ctx.palette.accent()),
            Span::styled(
                PRODUCT_COLORS
                    .get(self.color_index)
                    .filter(|_| self.custom_hex.is_none())
                    .map(|(name, _)| *name)
                    .unwrap_or("Custom"),
                style,
            ),
            Span::styled(format!(" {} ", self.color_hex()), ctx.palette.dimmed()),
            Span::styled("▶", ctx.palette.accent()),
        ]));

        Paragraph::new(lines)
            .alignment(ratatui::layout::Alignment::Center)
            .block(card(SHAPE, ctx.palette))
            .render(area, buf);
        Ok(())
    }
}

impl View for ConfiguratorView {
    fn render(&mut self, area: Rect, buf: &mut Buffer, ctx: &ViewContext) -> Result<(), FusionError> {
        let palette = ctx.palette;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(2)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        self.render_preview(columns[0], buf, ctx)?;

        if !self.requested_on_mount {
            self.requested_on_mount = true;
            self.generate();
        }

        let state = self.description.state();
        let mut lines = task_lines(&state, ctx, "", "Generating...");
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Hex: ", palette.dimmed()),
            Span::styled(self.hex_input.as_str(), palette.text()),
            Span::styled("▏", palette.accent()),
        ]));
        lines.push(Line::from(Span::styled(
            if state.is_pending() {
                "[Generating...]"
            } else {
                "[Enter] Generate New Description   [←/→] Color   Type #RRGGBB for a custom color"
            },
            palette.accent(),
        )));

        Paragraph::new(lines)
            .block(card("Product Configurator", palette))
            .wrap(Wrap { trim: true })
            .render(columns[1], buf);

        Paragraph::new(info_line(
            "The preview is drawn in the selected color; the description is generated from your configuration.",
            palette,
        ))
        .render(rows[1], buf);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.hex_input.len() < HEX_INPUT_MAX {
                    self.hex_input.push(c);
                }
            }
            KeyCode::Backspace => {
                self.hex_input.pop();
            }
            KeyCode::Left => self.cycle_color(false),
            KeyCode::Right => self.cycle_color(true),
            KeyCode::Enter => {
                // A typed color is described only once it parses
                if !self.apply_hex() || parse_hex_color(self.color_hex()).is_ok() {
                    self.generate();
                }
            }
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockProvider;
    use crate::tui::Palette;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#00BFFF").unwrap(), Color::Rgb(0, 191, 255));
        assert!(parse_hex_color("00BFFF").is_err());
        assert!(parse_hex_color("#00BFF").is_err());
        assert!(parse_hex_color("#GGGGGG").is_err());
    }

    #[test]
    fn test_cycle_wraps_both_ways() {
        let runner = TaskRunner::new(ProductCopywriter::new(Arc::new(MockProvider::new())));
        let mut view = ConfiguratorView::new(runner);
        view.cycle_color(false);
        assert_eq!(view.color_hex(), PRODUCT_COLORS[PRODUCT_COLORS.len() - 1].1);
        view.cycle_color(true);
        assert_eq!(view.color_hex(), "#00BFFF");
    }

    #[tokio::test]
    async fn test_first_render_requests_description() {
        let mock = Arc::new(MockProvider::new().with_default("Sleek."));
        let mut view = ConfiguratorView::new(TaskRunner::new(ProductCopywriter::new(mock.clone())));

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        let palette = Palette::dark();
        let ctx = ViewContext {
            palette: &palette,
            tick: 0,
        };
        view.render(area, &mut buf, &ctx).unwrap();
        assert!(view.description().state().is_pending());

        let mut rx = view.description().subscribe();
        rx.wait_for(|s| !s.is_pending()).await.unwrap();
        view.render(area, &mut buf, &ctx).unwrap();

        assert_eq!(mock.get_requests().len(), 1);
        assert!(mock.last_request().unwrap().prompt.contains("#00BFFF"));
    }

    fn type_text(view: &mut ConfiguratorView, text: &str) {
        for c in text.chars() {
            view.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[tokio::test]
    async fn test_typed_hex_becomes_the_color() {
        let mock = Arc::new(MockProvider::new());
        let mut view = ConfiguratorView::new(TaskRunner::new(ProductCopywriter::new(mock.clone())));

        type_text(&mut view, "#32CD32ff");
        assert_eq!(view.hex_input(), "#32CD32");
        view.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(view.color_hex(), "#32CD32");
        assert_eq!(view.hex_input(), "");
        let mut rx = view.description().subscribe();
        rx.wait_for(|s| !s.is_pending()).await.unwrap();
        assert!(mock.last_request().unwrap().prompt.contains("#32CD32"));

        view.cycle_color(true);
        assert_eq!(view.color_hex(), PRODUCT_COLORS[1].1);
    }

    #[tokio::test]
    async fn test_invalid_hex_is_render_error() {
        let mock = Arc::new(MockProvider::new());
        let mut view = ConfiguratorView::new(TaskRunner::new(ProductCopywriter::new(mock.clone())));
        type_text(&mut view, "#nope");
        view.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        // Not sent to the provider
        assert!(mock.get_requests().is_empty());

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        let palette = Palette::dark();
        let ctx = ViewContext {
            palette: &palette,
            tick: 0,
        };

        let err = view.render(area, &mut buf, &ctx).unwrap_err();
        assert!(matches!(err, FusionError::Render(_)));
    }
}
