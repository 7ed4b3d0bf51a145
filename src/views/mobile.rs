//! Mobile Preview - static phone-frame rendering of the dashboard

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

use super::{info_line, View, ViewContext, ViewModule};
use crate::error::FusionError;

const PHONE_WIDTH: u16 = 34;
const PHONE_HEIGHT: u16 = 20;

pub struct MobileModule;

impl ViewModule for MobileModule {
    fn mount(&self) -> Box<dyn View> {
        Box::new(MobileView)
    }
}

pub struct MobileView;

impl View for MobileView {
    fn render(&mut self, area: Rect, buf: &mut Buffer, ctx: &ViewContext) -> Result<(), FusionError> {
        let palette = ctx.palette;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(2)])
            .split(area);

        let width = PHONE_WIDTH.min(rows[0].width);
        let height = PHONE_HEIGHT.min(rows[0].height);
        let phone = Rect::new(
            rows[0].x + (rows[0].width - width) / 2,
            rows[0].y,
            width,
            height,
        );

        let screen = Style::default().fg(Color::Gray).bg(Color::Black);
        let lines = vec![
            Line::from(Span::styled(
                "Dashboard Preview",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Tasks", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(
                "Review Q2 analytics",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT),
            )),
            Line::from("Generate blog post draft"),
            Line::from(""),
            Line::from(Span::styled("Team Chat", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(Span::styled("Alice: Updates pushed.", Style::default().fg(Color::Green))),
            Line::from(Span::styled("Bob: Reviewing now.", Style::default().fg(Color::Magenta))),
        ];

        Paragraph::new(lines)
            .style(screen)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Thick)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(Span::styled(" ▬▬▬ ", Style::default().fg(Color::DarkGray)))
                    .title_alignment(ratatui::layout::Alignment::Center),
            )
            .render(phone, buf);

        Paragraph::new(info_line(
            "A terminal simulation of the dashboard's compact layout, built from the same widgets.",
            palette,
        ))
        .render(rows[1], buf);
        Ok(())
    }
}
