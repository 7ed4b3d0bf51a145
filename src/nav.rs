//! Navigation table
//!
//! Static path → [`ViewDescriptor`] mapping driving the sidebar, the header
//! and the view loader. Unknown paths resolve to the default view.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewDescriptor {
    pub label: &'static str,
    pub path: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub const DEFAULT_PATH: &str = "/";

pub static NAV_ITEMS: [ViewDescriptor; 5] = [
    ViewDescriptor {
        label: "Dashboard",
        path: "/",
        description: "Manage tasks and keep up with the team chat.",
        icon: "▦",
    },
    ViewDescriptor {
        label: "Analytics",
        path: "/analytics",
        description: "Quarterly performance charts with AI-generated insights.",
        icon: "▤",
    },
    ViewDescriptor {
        label: "Mobile Preview",
        path: "/mobile",
        description: "The dashboard as it renders on a small screen.",
        icon: "▯",
    },
    ViewDescriptor {
        label: "Blog",
        path: "/blog",
        description: "Generate a short blog post on any topic.",
        icon: "✎",
    },
    ViewDescriptor {
        label: "Configurator",
        path: "/configurator",
        description: "Configure a product and get marketing copy for it.",
        icon: "◆",
    },
];

/// Descriptor for `path`, or the default view when unknown
pub fn lookup(path: &str) -> &'static ViewDescriptor {
    NAV_ITEMS
        .iter()
        .find(|item| item.path == normalize(path))
        .unwrap_or(&NAV_ITEMS[0])
}

/// Accepts "blog", "/blog/", "#/blog"
fn normalize(path: &str) -> String {
    let trimmed = path.trim().trim_start_matches('#').trim_matches('/');
    format!("/{}", trimmed)
}

/// Current position in the navigation table
#[derive(Debug, Clone)]
pub struct Navigator {
    current: &'static ViewDescriptor,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(DEFAULT_PATH)
    }
}

impl Navigator {
    pub fn new(path: &str) -> Self {
        Self {
            current: lookup(path),
        }
    }

    pub fn current(&self) -> &'static ViewDescriptor {
        self.current
    }

    /// Navigate to `path`; returns the resolved descriptor
    pub fn navigate(&mut self, path: &str) -> &'static ViewDescriptor {
        let next = lookup(path);
        if next.path != normalize(path) {
            tracing::debug!(requested = %path, fallback = next.path, "unknown path, using default view");
        }
        self.current = next;
        next
    }

    pub fn next(&mut self) -> &'static ViewDescriptor {
        let idx = (self.index() + 1) % NAV_ITEMS.len();
        self.current = &NAV_ITEMS[idx];
        self.current
    }

    pub fn prev(&mut self) -> &'static ViewDescriptor {
        let idx = (self.index() + NAV_ITEMS.len() - 1) % NAV_ITEMS.len();
        self.current = &NAV_ITEMS[idx];
        self.current
    }

    pub fn index(&self) -> usize {
        NAV_ITEMS
            .iter()
            .position(|item| item.path == self.current.path)
            .unwrap_or(0)
    }
}
