//! Host collaborator surfaces
//!
//! The engine never touches a real page directly. It reaches the host through
//! two traits: [`Viewport`] for element positions and scroll offsets, and
//! [`History`] for the navigable entry stack behind the address bar. In-memory
//! implementations are provided for tests and headless embedders.

use serde_json::Value;
use url::Url;

/// Scrollable document surface
///
/// Offsets are pixels from the document top. Implementations are expected to
/// clamp written offsets into the scrollable range, like a real viewport does.
pub trait Viewport {
    /// Current scroll offset
    fn scroll_offset(&self) -> f64;

    /// Set the scroll offset immediately
    fn set_scroll_offset(&mut self, offset: f64);

    /// Height of the visible area
    fn viewport_height(&self) -> f64;

    /// Total scrollable height of the document
    fn content_height(&self) -> f64;

    /// Top position of the element with this id, relative to the document.
    /// `None` if no such element exists.
    fn element_top(&self, id: &str) -> Option<f64>;

    /// Maximum reachable scroll offset
    #[inline]
    fn max_scroll(&self) -> f64 {
        (self.content_height() - self.viewport_height()).max(0.0)
    }
}

/// Browser-history surface
///
/// Each entry carries an opaque state blob and the address it displays. The
/// engine layers a single key onto the blob and reads it back when the host
/// reports a pop event; everything else in the blob belongs to the host.
pub trait History {
    /// Current document location (what the address bar shows)
    fn location(&self) -> Url;

    /// Push a new entry after the current one
    fn push(&mut self, state: Value, url: &Url);

    /// Replace the current entry in place
    fn replace(&mut self, state: Value, url: &Url);
}

/// In-memory [`Viewport`] over a flat list of positioned elements
#[derive(Debug, Clone)]
pub struct MemoryPage {
    scroll: f64,
    viewport_height: f64,
    content_height: f64,
    elements: Vec<(String, f64)>,
}

impl MemoryPage {
    pub fn new(viewport_height: f64, content_height: f64) -> Self {
        Self {
            scroll: 0.0,
            viewport_height,
            content_height,
            elements: Vec::new(),
        }
    }

    /// Place an element at a document offset
    pub fn with_element(mut self, id: impl Into<String>, top: f64) -> Self {
        self.elements.push((id.into(), top));
        self
    }

    /// Change the visible-area height (window resize)
    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
        self.scroll = self.scroll.clamp(0.0, self.max_scroll());
    }
}

impl Viewport for MemoryPage {
    fn scroll_offset(&self) -> f64 {
        self.scroll
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll = offset.clamp(0.0, self.max_scroll());
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn content_height(&self) -> f64 {
        self.content_height
    }

    fn element_top(&self, id: &str) -> Option<f64> {
        self.elements
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, top)| *top)
    }
}

/// In-memory [`History`] stack with back/forward traversal
///
/// `back()`/`forward()` move the cursor and return the entry landed on, the
/// way a host would deliver a pop notification.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<(Value, Url)>,
    position: usize,
}

impl MemoryHistory {
    pub fn new(url: Url) -> Self {
        Self {
            entries: vec![(Value::Null, url)],
            position: 0,
        }
    }

    /// Number of entries in the stack
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// State blob of the current entry
    pub fn current_state(&self) -> &Value {
        &self.entries[self.position].0
    }

    /// Navigate back; returns the entry landed on
    pub fn back(&mut self) -> Option<(Value, Url)> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        Some(self.entries[self.position].clone())
    }

    /// Navigate forward; returns the entry landed on
    pub fn forward(&mut self) -> Option<(Value, Url)> {
        if self.position + 1 >= self.entries.len() {
            return None;
        }
        self.position += 1;
        Some(self.entries[self.position].clone())
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Url {
        self.entries[self.position].1.clone()
    }

    fn push(&mut self, state: Value, url: &Url) {
        // Pushing from the middle of the stack drops the forward entries
        self.entries.truncate(self.position + 1);
        self.entries.push((state, url.clone()));
        self.position = self.entries.len() - 1;
    }

    fn replace(&mut self, state: Value, url: &Url) {
        self.entries[self.position] = (state, url.clone());
    }
}
