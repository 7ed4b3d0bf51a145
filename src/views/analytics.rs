//! Analytics - quarterly charts plus generated insights

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, BarChart, Chart, Dataset, GraphType, Paragraph, Widget, Wrap};

use super::{card, task_lines, View, ViewContext, ViewModule};
use crate::error::FusionError;
use crate::operations::{quarterly_dataset, DataInsights, QuarterlyFigure};
use crate::provider::Provider;
use crate::runner::TaskRunner;

const IDLE_HINT: &str = "Press Enter to generate an analysis of the data.";

pub struct AnalyticsModule {
    provider: Arc<dyn Provider>,
}

impl AnalyticsModule {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

impl ViewModule for AnalyticsModule {
    fn mount(&self) -> Box<dyn View> {
        let runner = TaskRunner::new(DataInsights::new(Arc::clone(&self.provider)));
        Box::new(AnalyticsView::new(runner))
    }
}

pub struct AnalyticsView {
    data: Vec<QuarterlyFigure>,
    insights: TaskRunner<Vec<QuarterlyFigure>, String>,
}

impl AnalyticsView {
    pub fn new(insights: TaskRunner<Vec<QuarterlyFigure>, String>) -> Self {
        Self {
            data: quarterly_dataset(),
            insights,
        }
    }

    pub fn insights(&self) -> &TaskRunner<Vec<QuarterlyFigure>, String> {
        &self.insights
    }

    /// Request insights unless a request is already in flight
    pub fn request_insights(&self) -> bool {
        if self.insights.state().is_pending() {
            return false;
        }
        self.insights.spawn(self.data.clone());
        true
    }

    /// Profit per quarter as (index, value) points
    fn profit_points(&self) -> Vec<(f64, f64)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, q)| (i as f64, q.profit as f64))
            .collect()
    }

    fn line_chart<'a>(&'a self, points: &'a [(f64, f64)], ctx: &ViewContext) -> Chart<'a> {
        let palette = ctx.palette;
        let y_max = points.iter().map(|(_, y)| *y).fold(0.0, f64::max).max(1.0);
        let x_max = (points.len().saturating_sub(1) as f64).max(1.0);

        let dataset = Dataset::default()
            .name("Profit")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(palette.chart_profit))
            .data(points);

        Chart::new(vec![dataset])
            .block(card("Profit Over Time", palette))
            .x_axis(
                Axis::default()
                    .bounds([0.0, x_max])
                    .labels(self.data.iter().map(|q| Span::raw(q.name.as_str())))
                    .style(palette.dimmed()),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, y_max])
                    .labels([Span::raw("0"), Span::raw(format!("{}", y_max as u64))])
                    .style(palette.dimmed()),
            )
    }

    fn chart<'a>(
        title: &'a str,
        bars: &'a [(&'a str, u64)],
        style: Style,
        ctx: &ViewContext,
    ) -> BarChart<'a> {
        BarChart::default()
            .block(card(title, ctx.palette))
            .data(bars)
            .bar_width(6)
            .bar_gap(2)
            .bar_style(style)
            .value_style(ctx.palette.base().bg(ctx.palette.background))
            .label_style(ctx.palette.dimmed())
    }
}

impl View for AnalyticsView {
    fn render(&mut self, area: Rect, buf: &mut Buffer, ctx: &ViewContext) -> Result<(), FusionError> {
        let palette = ctx.palette;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Min(5)])
            .split(area);
        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        let revenue: Vec<(&str, u64)> = self.data.iter().map(|q| (q.name.as_str(), q.revenue)).collect();
        let profit = self.profit_points();

        Self::chart(
            "Quarterly Revenue",
            &revenue,
            Style::default().fg(palette.chart_revenue),
            ctx,
        )
        .render(charts[0], buf);
        self.line_chart(&profit, ctx).render(charts[1], buf);

        let state = self.insights.state();
        Paragraph::new(task_lines(&state, ctx, IDLE_HINT, "Generating..."))
            .block(card("AI-Powered Analysis", palette))
            .wrap(Wrap { trim: false })
            .render(rows[1], buf);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => {
                self.request_insights();
                true
            }
            _ => false,
        }
    }
}
