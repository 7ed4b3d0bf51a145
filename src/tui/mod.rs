//! TUI Module - terminal host for the application shell
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     SHELL (app.rs, widgets/)                        │
//! │  Layout, chrome, supervised content region, overlay host.           │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ Box<dyn View> mounted per path
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 VIEWS (crate::views) via ViewLoader                 │
//! │  Each view drives its own TaskRunners over the Provider.            │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ watch / broadcast
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │        TaskRunner state, ThemeStore, loader slots (tokio)           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod events;
mod terminal;

pub mod theme;
pub mod widgets;

pub use app::{Shell, TuiApp};
pub use events::{handle_key_event, Action};
pub use theme::Palette;

use crate::config::FusionConfig;

/// Run the TUI shell
pub async fn run(config: &FusionConfig, initial_path: Option<&str>) -> anyhow::Result<()> {
    let app = TuiApp::new(config, initial_path)?;
    app.run().await
}
