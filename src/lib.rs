//! Fusion - terminal application shell over async AI operations
//!
//! Core pieces:
//! - [`TaskRunner`]: wraps an async [`Operation`] into a `{result, pending, failure}` state
//! - [`Supervisor`]: catches render failures of a region and shows a fallback
//! - [`ViewLoader`]: resolves view modules on demand, once per path
//! - [`ThemeStore`]: process-wide light/dark value with subscribers
//! - [`OverlayHost`]: modal content drawn at the overlay mount point

pub mod config;
pub mod error;
pub mod loader;
pub mod nav;
pub mod operations;
pub mod overlay;
pub mod provider;
pub mod runner;
pub mod supervisor;
pub mod theme;
pub mod tui;
pub mod views;

pub use config::FusionConfig;
pub use error::{FixSuggestion, FusionError};
pub use loader::{LoadStatus, ModuleResolver, ViewLoader};
pub use nav::{Navigator, ViewDescriptor, NAV_ITEMS};
pub use operations::{BlogPost, BlogPostWriter, DataInsights, ProductConfig, ProductCopywriter, QuarterlyFigure};
pub use overlay::{MountPoints, OverlayHost, OVERLAY_ROOT};
pub use provider::{create_provider, GenerateRequest, Provider};
pub use runner::{from_fn, Operation, TaskPhase, TaskRunner, TaskState};
pub use supervisor::{Supervised, Supervisor, SupervisorState};
pub use theme::{ThemeStore, ThemeValue};
