//! Views - independently loadable units bound to a navigation path
//!
//! A [`ViewModule`] is what the [`ViewLoader`](crate::loader::ViewLoader)
//! resolves (once per path); [`ViewModule::mount`] builds a fresh [`View`]
//! each time the path is navigated to. Views render into a scratch buffer
//! and report failures as `Err`, which the shell's supervisor catches.

mod analytics;
mod blog;
mod configurator;
mod dashboard;
mod mobile;

pub use analytics::{AnalyticsModule, AnalyticsView};
pub use blog::{BlogModule, BlogView};
pub use configurator::{parse_hex_color, ConfiguratorModule, ConfiguratorView, PRODUCT_COLORS};
pub use dashboard::{DashboardModule, DashboardView, Todo};
pub use mobile::{MobileModule, MobileView};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::KeyEvent;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders};

use crate::error::FusionError;
use crate::loader::ModuleResolver;
use crate::provider::Provider;
use crate::runner::{TaskPhase, TaskState};
use crate::tui::theme::icons;
use crate::tui::Palette;

/// Read-only inputs shared by every view render
pub struct ViewContext<'a> {
    pub palette: &'a Palette,
    /// Frame counter, drives spinners
    pub tick: u64,
}

impl ViewContext<'_> {
    pub fn spinner(&self) -> &'static str {
        icons::SPINNER[(self.tick / 8) as usize % icons::SPINNER.len()]
    }
}

pub trait View: Send {
    fn render(&mut self, area: Rect, buf: &mut Buffer, ctx: &ViewContext) -> Result<(), FusionError>;

    /// Returns true when the view consumed the key
    fn handle_key(&mut self, _key: KeyEvent) -> bool {
        false
    }
}

pub trait ViewModule: Send + Sync {
    /// Build a fresh view; takes no external inputs
    fn mount(&self) -> Box<dyn View>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolver
// ─────────────────────────────────────────────────────────────────────────────

/// Resolves the built-in view modules by path
pub struct AppResolver {
    provider: Arc<dyn Provider>,
    load_delay: Duration,
}

impl AppResolver {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            load_delay: Duration::ZERO,
        }
    }

    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }
}

#[async_trait]
impl ModuleResolver<dyn ViewModule> for AppResolver {
    async fn resolve(&self, path: &str) -> Result<Arc<dyn ViewModule>, FusionError> {
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }

        let provider = Arc::clone(&self.provider);
        let module: Arc<dyn ViewModule> = match path {
            "/" => Arc::new(DashboardModule),
            "/analytics" => Arc::new(AnalyticsModule::new(provider)),
            "/mobile" => Arc::new(MobileModule),
            "/blog" => Arc::new(BlogModule::new(provider)),
            "/configurator" => Arc::new(ConfiguratorModule::new(provider)),
            other => {
                return Err(FusionError::ViewLoad {
                    path: other.to_string(),
                    reason: "no module registered for this path".to_string(),
                })
            }
        };
        Ok(module)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared rendering helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Bordered card with a bold title
pub(crate) fn card<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border())
        .title(Span::styled(format!(" {} ", title), palette.header()))
}

/// Lines describing a task runner's state for views that show plain text
pub(crate) fn task_lines<'a>(
    state: &'a TaskState<String>,
    ctx: &ViewContext,
    idle_hint: &'a str,
    pending_label: &'a str,
) -> Vec<Line<'a>> {
    let palette = ctx.palette;
    match state.phase() {
        TaskPhase::Idle => vec![Line::from(Span::styled(idle_hint, palette.dimmed()))],
        TaskPhase::Pending => vec![Line::from(vec![
            Span::styled(ctx.spinner(), palette.accent()),
            Span::raw(" "),
            Span::styled(pending_label, palette.dimmed()),
        ])],
        TaskPhase::Failed => vec![Line::from(Span::styled(
            state.failure().unwrap_or_default(),
            palette.error(),
        ))],
        TaskPhase::Succeeded => state
            .result()
            .map(|text| {
                text.lines()
                    .map(|l| Line::from(Span::styled(l, palette.text())))
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Info line shown at the bottom of demo views
pub(crate) fn info_line<'a>(text: &'a str, palette: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{} ", icons::INFO), palette.accent()),
        Span::styled(text, palette.dimmed()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockProvider;

    #[tokio::test]
    async fn test_resolver_knows_every_nav_path() {
        let resolver = AppResolver::new(Arc::new(MockProvider::new()));
        for item in crate::nav::NAV_ITEMS.iter() {
            assert!(resolver.resolve(item.path).await.is_ok(), "{}", item.path);
        }
    }

    #[tokio::test]
    async fn test_resolver_rejects_unknown_path() {
        let resolver = AppResolver::new(Arc::new(MockProvider::new()));
        let err = resolver.resolve("/nowhere").await.err().unwrap();
        assert!(matches!(err, FusionError::ViewLoad { .. }));
    }
}
