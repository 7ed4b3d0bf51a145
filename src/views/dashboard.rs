//! Dashboard - task manager and team chat

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use super::{card, View, ViewContext, ViewModule};
use crate::error::FusionError;
use crate::tui::theme::icons;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: u64,
    pub text: String,
    pub completed: bool,
}

impl Todo {
    fn new(id: u64, text: &str, completed: bool) -> Self {
        Self {
            id,
            text: text.to_string(),
            completed,
        }
    }
}

const CHAT: &[(&str, &str, Color)] = &[
    ("Alice", "Just pushed the latest updates to the analytics branch.", Color::Green),
    (
        "Bob",
        "Great! I'll review them now. How's the AI integration for insights coming along?",
        Color::Magenta,
    ),
    (
        "Alice",
        "It's working surprisingly well. The generated analysis is spot on. Check it out on the Analytics page.",
        Color::Green,
    ),
    (
        "Charlie",
        "Can someone help me with the configurator? The preview colors look a bit off.",
        Color::Yellow,
    ),
];

pub struct DashboardModule;

impl ViewModule for DashboardModule {
    fn mount(&self) -> Box<dyn View> {
        Box::new(DashboardView::new())
    }
}

pub struct DashboardView {
    todos: Vec<Todo>,
    input: String,
    selected: usize,
    next_id: u64,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardView {
    pub fn new() -> Self {
        Self {
            todos: vec![
                Todo::new(1, "Review Q2 analytics report", true),
                Todo::new(2, "Generate draft for new blog post", false),
                Todo::new(3, "Finalize 3D model for \"Aether-Loom\"", false),
            ],
            input: String::new(),
            selected: 0,
            next_id: 4,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Adds the current input as a task; blank input is ignored
    pub fn submit(&mut self) -> bool {
        if self.input.trim().is_empty() {
            return false;
        }
        let text = std::mem::take(&mut self.input);
        self.todos.push(Todo {
            id: self.next_id,
            text: text.trim().to_string(),
            completed: false,
        });
        self.next_id += 1;
        true
    }

    pub fn toggle_selected(&mut self) {
        if let Some(todo) = self.todos.get_mut(self.selected) {
            todo.completed = !todo.completed;
        }
    }

    pub fn delete_selected(&mut self) {
        if self.selected < self.todos.len() {
            self.todos.remove(self.selected);
            self.selected = self.selected.min(self.todos.len().saturating_sub(1));
        }
    }

    fn render_tasks(&self, area: Rect, buf: &mut Buffer, ctx: &ViewContext) {
        let palette = ctx.palette;
        let mut lines = vec![
            Line::from(vec![
                Span::styled("> ", palette.accent()),
                if self.input.is_empty() {
                    Span::styled("Add a new task...", palette.dimmed())
                } else {
                    Span::styled(self.input.as_str(), palette.text())
                },
                Span::styled("▏", palette.accent()),
            ]),
            Line::from(""),
        ];

        for (i, todo) in self.todos.iter().enumerate() {
            let marker = if todo.completed { icons::CHECK } else { " " };
            let mut text_style = if todo.completed {
                palette.dimmed().add_modifier(Modifier::CROSSED_OUT)
            } else {
                palette.text()
            };
            if i == self.selected {
                text_style = text_style.add_modifier(Modifier::REVERSED);
            }
            lines.push(Line::from(vec![
                Span::styled(format!(" [{}] ", marker), palette.success()),
                Span::styled(todo.text.as_str(), text_style),
            ]));
        }

        Paragraph::new(lines)
            .block(card("Task Manager", palette))
            .render(area, buf);
    }

    fn render_chat(&self, area: Rect, buf: &mut Buffer, ctx: &ViewContext) {
        let palette = ctx.palette;
        let lines: Vec<Line> = CHAT
            .iter()
            .flat_map(|(who, text, color)| {
                [
                    Line::from(vec![
                        Span::styled(
                            format!("{}: ", who),
                            Style::default().fg(*color).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(*text, palette.text()),
                    ]),
                    Line::from(""),
                ]
            })
            .collect();

        Paragraph::new(lines)
            .block(card("Team Chat", palette))
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

impl View for DashboardView {
    fn render(&mut self, area: Rect, buf: &mut Buffer, ctx: &ViewContext) -> Result<(), FusionError> {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        self.render_tasks(columns[0], buf, ctx);
        self.render_chat(columns[1], buf, ctx);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => {
                if !self.submit() {
                    self.toggle_selected();
                }
            }
            KeyCode::Delete => self.delete_selected(),
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.todos.len() {
                    self.selected += 1;
                }
            }
            _ => return false,
        }
        true
    }
}
