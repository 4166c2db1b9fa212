//! Jump-mark target resolution
//!
//! Turns a hash string into a [`JumpTarget`] and a target into a final pixel
//! offset. "Does not qualify" and "element not found" are normal outcomes
//! (`None`), never errors; the caller leaves default host behavior in place.

use crate::config::GlideConfig;
use crate::page::Viewport;

/// Suffix mapping to the top of the document
const TOP_SUFFIX: &str = "_top";
/// Suffix mapping to the bottom of the document
const BOTTOM_SUFFIX: &str = "_bottom";

/// Where a jump resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum JumpTarget {
    /// Absolute pixel offset, used verbatim
    Offset(f64),
    /// Element id to look up in the document
    Element(String),
    /// Top of the document (offset 0)
    Top,
    /// Bottom of the document (maximum scroll offset)
    Bottom,
}

/// Check whether a hash qualifies as a jump mark and resolve its target
///
/// A hash qualifies only if it begins with `#` + `action_prefix` +
/// `hash_prefix` (case-sensitive, exact character sequence). The remaining
/// suffix selects the target: `_top`, `_bottom`, or an element id.
pub fn resolve_hash(hash: &str, config: &GlideConfig) -> Option<JumpTarget> {
    let rest = hash
        .strip_prefix('#')?
        .strip_prefix(config.action_prefix.as_str())?
        .strip_prefix(config.hash_prefix.as_str())?;

    match rest {
        TOP_SUFFIX => Some(JumpTarget::Top),
        BOTTOM_SUFFIX => Some(JumpTarget::Bottom),
        "" => None,
        id => Some(JumpTarget::Element(id.to_string())),
    }
}

/// Resolve a target to its final pixel offset
///
/// Element offsets subtract the clip offset and clamp into `[0, max_scroll]`.
/// Raw pixel offsets pass through verbatim. `None` means the element does not
/// exist in the document.
pub fn target_offset<V: Viewport + ?Sized>(
    target: &JumpTarget,
    viewport: &V,
    config: &GlideConfig,
) -> Option<f64> {
    let max_scroll = viewport.max_scroll();
    match target {
        JumpTarget::Offset(px) => Some(*px),
        JumpTarget::Top => Some(0.0),
        JumpTarget::Bottom => Some(max_scroll),
        JumpTarget::Element(id) => {
            let top = viewport.element_top(id)?;
            let clip = config.clip_offset.to_px(viewport.viewport_height());
            Some((top - clip).clamp(0.0, max_scroll))
        }
    }
}
