//! Theme Store
//!
//! One process-wide light/dark value. The only mutator is [`ThemeStore::toggle`];
//! consumers read [`ThemeStore::current`] or subscribe to every change.
//! The value is not persisted and starts as [`ThemeValue::Dark`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::Lazy;
use tokio::sync::broadcast;

/// Buffered notifications per subscriber before it starts lagging
const SUBSCRIBER_CAPACITY: usize = 64;

static GLOBAL: Lazy<ThemeStore> = Lazy::new(ThemeStore::new);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemeValue {
    Light,
    #[default]
    Dark,
}

impl ThemeValue {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

impl fmt::Display for ThemeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

pub struct ThemeStore {
    dark: AtomicBool,
    notifier: broadcast::Sender<ThemeValue>,
}

impl ThemeStore {
    /// Independent store, starting at the default value
    pub fn new() -> Self {
        let (notifier, _) = broadcast::channel(SUBSCRIBER_CAPACITY);
        Self {
            dark: AtomicBool::new(ThemeValue::default().is_dark()),
            notifier,
        }
    }

    /// The process-wide store
    pub fn global() -> &'static ThemeStore {
        &GLOBAL
    }

    pub fn current(&self) -> ThemeValue {
        if self.dark.load(Ordering::SeqCst) {
            ThemeValue::Dark
        } else {
            ThemeValue::Light
        }
    }

    /// Flip the value and notify subscribers; returns the new value
    pub fn toggle(&self) -> ThemeValue {
        let was_dark = self.dark.fetch_xor(true, Ordering::SeqCst);
        let next = if was_dark {
            ThemeValue::Light
        } else {
            ThemeValue::Dark
        };
        tracing::debug!(theme = %next, "theme toggled");
        // No receivers is fine
        let _ = self.notifier.send(next);
        next
    }

    /// Receive every value published after this call, in order
    pub fn subscribe(&self) -> broadcast::Receiver<ThemeValue> {
        self.notifier.subscribe()
    }
}

impl Default for ThemeStore {
    fn default() -> Self {
        Self::new()
    }
}
