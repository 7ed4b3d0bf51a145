//! Blog - topic prompt and generated post

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use super::{card, info_line, View, ViewContext, ViewModule};
use crate::error::FusionError;
use crate::operations::{BlogPost, BlogPostWriter};
use crate::provider::Provider;
use crate::runner::TaskRunner;

pub const DEFAULT_TOPIC: &str = "Rust async";

pub struct BlogModule {
    provider: Arc<dyn Provider>,
}

impl BlogModule {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

impl ViewModule for BlogModule {
    fn mount(&self) -> Box<dyn View> {
        let runner = TaskRunner::new(BlogPostWriter::new(Arc::clone(&self.provider)));
        Box::new(BlogView::new(runner))
    }
}

pub struct BlogView {
    topic: String,
    post: TaskRunner<String, BlogPost>,
}

impl BlogView {
    pub fn new(post: TaskRunner<String, BlogPost>) -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            post,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn post(&self) -> &TaskRunner<String, BlogPost> {
        &self.post
    }

    /// Start generation; refused while pending or when the topic is blank
    pub fn generate(&self) -> bool {
        let topic = self.topic.trim();
        if topic.is_empty() || self.post.state().is_pending() {
            return false;
        }
        self.post.spawn(topic.to_string());
        true
    }
}

impl View for BlogView {
    fn render(&mut self, area: Rect, buf: &mut Buffer, ctx: &ViewContext) -> Result<(), FusionError> {
        let palette = ctx.palette;
        let state = self.post.state();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3), Constraint::Length(2)])
            .split(area);

        let button = if state.is_pending() {
            "[Generating...]"
        } else {
            "[Enter] Generate Post"
        };
        Paragraph::new(Line::from(vec![
            Span::styled("Topic: ", palette.dimmed()),
            Span::styled(self.topic.as_str(), palette.text()),
            Span::styled("▏  ", palette.accent()),
            Span::styled(button, palette.accent()),
        ]))
        .block(card("Blog Content Generator", palette))
        .render(rows[0], buf);

        let mut lines = Vec::new();
        if state.is_pending() {
            lines.push(Line::from(vec![
                Span::styled(ctx.spinner(), palette.accent()),
                Span::styled(" Writing...", palette.dimmed()),
            ]));
        } else if let Some(message) = state.failure() {
            lines.push(Line::from(Span::styled(message, palette.error())));
        } else if let Some(post) = state.result() {
            let title_style = if post.is_fallback {
                palette.error()
            } else {
                palette.header().add_modifier(Modifier::UNDERLINED)
            };
            lines.push(Line::from(Span::styled(post.title.as_str(), title_style)));
            lines.push(Line::from(""));
            lines.extend(
                post.content
                    .lines()
                    .map(|l| Line::from(Span::styled(l, palette.text()))),
            );
        }

        Paragraph::new(lines)
            .block(card("Post", palette))
            .wrap(Wrap { trim: false })
            .render(rows[1], buf);

        Paragraph::new(info_line(
            "Generated posts could be pre-rendered by a static site generator for search engines.",
            palette,
        ))
        .render(rows[2], buf);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.topic.push(c),
            KeyCode::Backspace => {
                self.topic.pop();
            }
            KeyCode::Enter => {
                self.generate();
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

    fn view(mock: Arc<MockProvider>) -> BlogView {
        BlogView::new(TaskRunner::new(BlogPostWriter::new(mock)))
    }

    #[tokio::test]
    async fn test_blank_topic_is_refused() {
        let mock = Arc::new(MockProvider::new());
        let mut view = view(mock.clone());
        for _ in 0..DEFAULT_TOPIC.len() {
            view.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        }
        view.handle_key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));

        assert!(!view.generate());
        assert!(mock.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_generate_sends_trimmed_topic() {
        let mock = Arc::new(MockProvider::new().with_default(r#"{"title":"T","content":"C"}"#));
        let view = view(mock.clone());

        assert!(view.generate());
        let mut rx = view.post().subscribe();
        rx.wait_for(|s| !s.is_pending()).await.unwrap();

        assert_eq!(view.post().state().result().map(|p| p.title.as_str()), Some("T"));
        assert!(mock.last_request().unwrap().prompt.contains("\"Rust async\""));
    }
}
