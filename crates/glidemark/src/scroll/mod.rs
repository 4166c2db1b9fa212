//! Scroll animation subsystem
//!
//! Layered from pure pieces up to the controller:
//!
//! - `easing` - Pure easing functions (quadratic, cubic)
//! - `timing` - Time calculation utilities (progress, interpolation)
//! - `animation` - Animation controller combining the above
//!
//! # Usage
//!
//! ```ignore
//! use glidemark::scroll::ScrollAnimator;
//!
//! let mut animator = ScrollAnimator::new();
//!
//! // Begin a glide; the return value is the offset to show immediately
//! let shown = animator.start(0.0, 1850.0, true, &config, 1000.0, Instant::now());
//!
//! // In the host frame loop, advance and apply the current position
//! if let Some(offset) = animator.update(Instant::now()) {
//!     viewport.set_scroll_offset(offset);
//! }
//! ```

pub mod animation;
pub mod easing;
pub mod timing;

// Re-exports for convenient access
pub use animation::ScrollAnimator;
pub use easing::EasingType;
