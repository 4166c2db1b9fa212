//! Navigation and history coordination
//!
//! [`ScrollCoordinator`] funnels the three navigation triggers (page ready,
//! link click, history pop / hash change) into a single glide operation, and
//! keeps the host history stack in step with the animated positions. One
//! boolean latch suppresses the duplicate hash-change notification that
//! trails a history pop.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::config::{GlideConfig, GlideOptions};
use crate::error::{Error, Result};
use crate::page::{History, Viewport};
use crate::resolve::{resolve_hash, target_offset, JumpTarget};
use crate::scroll::ScrollAnimator;

/// Key under which the engine layers its entry onto the host's state blob
const STATE_KEY: &str = "glidemark";

/// How long after a history pop the trailing hash-change stays suppressed
const HASHCHANGE_SUPPRESS_WINDOW: Duration = Duration::from_millis(64);

/// Per-entry navigation state recorded in the host history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryEntry {
    /// Scroll offset to return to (the position before a jump)
    Offset(f64),
    /// Jump-mark hash that was navigated to
    Hash(String),
}

impl HistoryEntry {
    /// Wrap this entry into a state blob under the engine's key
    fn into_state(self) -> Value {
        json!({ STATE_KEY: self })
    }

    /// Read the engine's entry back out of a popped state blob
    fn from_state(state: &Value) -> Option<Self> {
        serde_json::from_value(state.get(STATE_KEY)?.clone()).ok()
    }
}

/// A request arriving at the public entry point
///
/// Mirrors the accepted host-side argument shapes: a jump-mark hash, an
/// element id, a raw pixel offset, or a configuration update.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollRequest {
    /// A hash, e.g. `#!jump:section2`; ignored unless it qualifies
    Hash(String),
    /// An element id to glide to directly
    Element(String),
    /// An absolute pixel offset, used verbatim
    Offset(f64),
    /// Merge new options into the current configuration
    Configure(GlideOptions),
}

impl ScrollRequest {
    /// Interpret a dynamic host value as a request
    ///
    /// Strings starting with `#` are hashes, other strings element ids,
    /// numbers pixel offsets, objects configuration updates. Anything else is
    /// a caller mistake and reported as [`Error::InvalidRequest`].
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(s) if s.starts_with('#') => Ok(Self::Hash(s)),
            Value::String(s) => Ok(Self::Element(s)),
            Value::Number(n) => n
                .as_f64()
                .map(Self::Offset)
                .ok_or_else(|| Error::InvalidRequest("offset is not a finite number".to_string())),
            Value::Object(map) => {
                let options: GlideOptions = serde_json::from_value(Value::Object(map))?;
                Ok(Self::Configure(options))
            }
            Value::Null => Err(Error::InvalidRequest("null is not a scroll target".to_string())),
            Value::Bool(_) => Err(Error::InvalidRequest(
                "a boolean is not a scroll target".to_string(),
            )),
            Value::Array(_) => Err(Error::InvalidRequest(
                "an array is not a scroll target".to_string(),
            )),
        }
    }
}

/// Coordinates anchor navigation, scroll animation, and history state
///
/// Owns the injected [`Viewport`] and [`History`] collaborators, the current
/// configuration, and the single scroll animator. The host forwards its
/// navigation notifications to the `handle_*` methods; each returns whether
/// the engine took the event (the host should then prevent its default
/// handling) or left it to default behavior.
///
/// The host's frame loop drives [`update`](Self::update) while
/// [`is_animating`](Self::is_animating) reports pending work.
pub struct ScrollCoordinator<V, H> {
    viewport: V,
    history: H,
    animator: ScrollAnimator,
    config: GlideConfig,
    /// Armed by a history pop; hash changes are ignored until it expires
    suppress_hash_change_until: Option<Instant>,
}

impl<V: Viewport, H: History> ScrollCoordinator<V, H> {
    pub fn new(viewport: V, history: H, config: GlideConfig) -> Self {
        Self {
            viewport,
            history,
            animator: ScrollAnimator::new(),
            config,
            suppress_hash_change_until: None,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(viewport: V, history: H) -> Self {
        Self::new(viewport, history, GlideConfig::default())
    }

    pub fn config(&self) -> &GlideConfig {
        &self.config
    }

    /// Replace the configuration wholesale
    pub fn set_config(&mut self, config: GlideConfig) {
        self.config = config;
    }

    /// Merge partial options into the current configuration
    pub fn configure(&mut self, options: GlideOptions) {
        options.apply(&mut self.config);
        debug!("configuration updated: {:?}", self.config);
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Check if a glide is currently running
    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// Handle the public entry point
    ///
    /// Target variants glide when they resolve; `Configure` merges options.
    /// Returns whether a glide was started.
    pub fn invoke(&mut self, request: ScrollRequest, now: Instant) -> Result<bool> {
        match request {
            ScrollRequest::Hash(hash) => {
                let Some(target) = resolve_hash(&hash, &self.config) else {
                    return Ok(false);
                };
                Ok(self.glide(&target, false, now))
            }
            ScrollRequest::Element(id) => Ok(self.glide(&JumpTarget::Element(id), false, now)),
            ScrollRequest::Offset(px) => Ok(self.glide(&JumpTarget::Offset(px), false, now)),
            ScrollRequest::Configure(options) => {
                self.configure(options);
                Ok(false)
            }
        }
    }

    /// Handle a dynamic host value at the public entry point
    pub fn invoke_value(&mut self, value: Value, now: Instant) -> Result<bool> {
        self.invoke(ScrollRequest::from_value(value)?, now)
    }

    /// Handle initial page readiness
    ///
    /// If the current address fragment qualifies as a jump mark, glides to it
    /// with a hop, so a deep link into a long page does not animate across
    /// the whole document.
    pub fn handle_page_ready(&mut self, now: Instant) -> bool {
        let location = self.history.location();
        let Some(fragment) = location.fragment() else {
            return false;
        };
        let hash = format!("#{}", fragment);
        let Some(target) = resolve_hash(&hash, &self.config) else {
            return false;
        };
        debug!("page ready with jump mark {}", hash);
        self.glide(&target, true, now)
    }

    /// Handle a click on an anchor link
    ///
    /// Call only for clicks no other listener has already handled. `href` is
    /// the link's raw target, resolved against the current location. The
    /// click is taken only when the link stays on the same document (path and
    /// query equal, only the fragment differs), its hash qualifies, and the
    /// target resolves; returns whether the host must prevent the native
    /// jump.
    pub fn handle_link_click(&mut self, href: &str, now: Instant) -> bool {
        let location = self.history.location();
        let Ok(link) = location.join(href) else {
            return false;
        };
        let Some(fragment) = link.fragment() else {
            return false;
        };
        let hash = format!("#{}", fragment);
        let Some(target) = resolve_hash(&hash, &self.config) else {
            return false;
        };
        if !same_document(&link, &location) {
            return false;
        }
        let Some(offset) = target_offset(&target, &self.viewport, &self.config) else {
            return false;
        };

        // Without a hash in the address there is no entry to come back to, so
        // record the pre-jump position first.
        if location.fragment().is_none() {
            let snapshot = HistoryEntry::Offset(self.viewport.scroll_offset());
            self.history.push(snapshot.into_state(), &location);
        }

        let mut destination = location.clone();
        destination.set_fragment(Some(fragment));
        self.history
            .push(HistoryEntry::Hash(hash.clone()).into_state(), &destination);

        debug!("jump mark {} clicked, gliding to {:.0}", hash, offset);
        self.glide_to_offset(offset, false, now);
        true
    }

    /// Handle a history pop (back/forward navigation)
    ///
    /// `state` is the blob of the entry landed on. Returns whether the host
    /// must prevent its native scroll restoration. Always arms the
    /// suppression latch: a redundant hash-change notification follows every
    /// pop and must not scroll twice.
    pub fn handle_history_pop(&mut self, state: &Value, now: Instant) -> bool {
        self.suppress_hash_change_until = Some(now + HASHCHANGE_SUPPRESS_WINDOW);

        let Some(entry) = HistoryEntry::from_state(state) else {
            return false;
        };
        if self.config.disable_popstate_animation {
            trace!("popstate animation disabled, leaving scroll restoration to the host");
            return false;
        }

        match entry {
            HistoryEntry::Offset(offset) => {
                debug!("history pop, restoring offset {:.0}", offset);
                self.glide_to_offset(offset, false, now);
                true
            }
            HistoryEntry::Hash(hash) => {
                let Some(target) = resolve_hash(&hash, &self.config) else {
                    return false;
                };
                debug!("history pop, returning to jump mark {}", hash);
                self.glide(&target, false, now)
            }
        }
    }

    /// Handle an address-fragment change not caused by a history pop
    ///
    /// `hash` is the new fragment including the leading `#`. Suppressed
    /// inside the latch window after a pop. A qualifying, resolving hash
    /// replaces (not pushes) the current entry and glides; returns whether
    /// the host must prevent its default jump.
    pub fn handle_hash_change(&mut self, hash: &str, now: Instant) -> bool {
        if let Some(until) = self.suppress_hash_change_until {
            if now < until {
                trace!("hash change suppressed after history pop");
                return false;
            }
            self.suppress_hash_change_until = None;
        }

        let Some(target) = resolve_hash(hash, &self.config) else {
            return false;
        };
        let Some(offset) = target_offset(&target, &self.viewport, &self.config) else {
            return false;
        };

        // The address already changed under us, so rewrite the current entry
        // rather than growing the stack.
        let mut destination = self.history.location();
        destination.set_fragment(Some(hash.strip_prefix('#').unwrap_or(hash)));
        self.history
            .replace(HistoryEntry::Hash(hash.to_string()).into_state(), &destination);

        debug!("hash changed to {}, gliding to {:.0}", hash, offset);
        self.glide_to_offset(offset, false, now);
        true
    }

    /// Handle user scroll input (wheel, trackpad)
    ///
    /// A user-initiated scroll during a glide cancels it immediately, ceding
    /// control back to the user.
    pub fn handle_user_scroll(&mut self) {
        self.animator.cancel();
    }

    /// Advance the active glide and apply it to the viewport
    ///
    /// Call on the host's frame tick. Returns the current scroll offset.
    pub fn update(&mut self, now: Instant) -> f64 {
        if let Some(offset) = self.animator.update(now) {
            self.viewport.set_scroll_offset(offset);
        }
        self.viewport.scroll_offset()
    }

    /// Resolve and start a glide; false when the target is not applicable
    fn glide(&mut self, target: &JumpTarget, hop: bool, now: Instant) -> bool {
        let Some(offset) = target_offset(target, &self.viewport, &self.config) else {
            return false;
        };
        self.glide_to_offset(offset, hop, now);
        true
    }

    fn glide_to_offset(&mut self, offset: f64, hop: bool, now: Instant) {
        let from = self.viewport.scroll_offset();
        let shown = self.animator.start(
            from,
            offset,
            hop,
            &self.config,
            self.viewport.viewport_height(),
            now,
        );
        self.viewport.set_scroll_offset(shown);
    }
}

/// Same document: everything but the fragment is equal
fn same_document(link: &url::Url, location: &url::Url) -> bool {
    link.scheme() == location.scheme()
        && link.host_str() == location.host_str()
        && link.port_or_known_default() == location.port_or_known_default()
        && link.path() == location.path()
        && link.query() == location.query()
}
