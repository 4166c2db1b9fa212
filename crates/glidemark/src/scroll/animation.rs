//! Scroll animation controller
//!
//! Owns at most one active animation. Starting a glide always preempts the
//! previous one; user scroll input cancels outright. The controller is
//! poll-driven: the coordinator calls `update()` on the host's frame tick and
//! writes the returned offset to the viewport.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::GlideConfig;

use super::easing::EasingType;
use super::timing::{is_complete, lerp, progress};

/// Active scroll animation state
#[derive(Debug, Clone)]
struct ActiveAnimation {
    /// Animation start time
    start: Instant,
    /// Starting scroll position
    from: f64,
    /// Target scroll position
    to: f64,
    /// Animation duration
    duration: Duration,
    /// Easing function
    easing: EasingType,
}

/// Scroll animation controller
///
/// Call [`start`](Self::start) to begin a glide, then [`update`](Self::update)
/// each frame for the interpolated position while one is running.
#[derive(Debug, Clone, Default)]
pub struct ScrollAnimator {
    /// Current active animation (if any)
    animation: Option<ActiveAnimation>,
}

impl ScrollAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an animation is currently active
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Final position of the running animation, if any
    pub fn target_offset(&self) -> Option<f64> {
        self.animation.as_ref().map(|a| a.to)
    }

    /// Begin a glide from `from` to `to`
    ///
    /// Any in-progress animation is cancelled first; exactly one runs
    /// afterward. Returns the offset the viewport must show immediately:
    /// the post-hop position when a hop applies, `to` itself when animation
    /// is disabled, `from` otherwise.
    ///
    /// With `hop` set and the distance exceeding the configured hop offset,
    /// the viewport repositions instantly to within one hop offset of the
    /// target and only the remainder animates, under the hop easing curve.
    pub fn start(
        &mut self,
        from: f64,
        to: f64,
        hop: bool,
        config: &GlideConfig,
        viewport_height: f64,
        now: Instant,
    ) -> f64 {
        self.animation = None;

        if !config.is_animated() {
            return to;
        }

        let mut from = from;
        let mut easing = config.easing;
        let delta = to - from;

        if hop {
            let hop_px = config.hop_offset.to_px(viewport_height);
            if hop_px < delta.abs() {
                from = if delta > 0.0 { to - hop_px } else { to + hop_px };
                easing = config.hop_easing;
                debug!("hopped to {:.0} before gliding to {:.0}", from, to);
            }
        }

        if from == to {
            return to;
        }

        self.animation = Some(ActiveAnimation {
            start: now,
            from,
            to,
            duration: config.animation_duration(),
            easing,
        });
        from
    }

    /// Advance the animation and return the current interpolated position
    ///
    /// `None` while idle. Completes (and clears) the animation once `now`
    /// passes the configured duration.
    pub fn update(&mut self, now: Instant) -> Option<f64> {
        let anim = self.animation.as_ref()?;

        if is_complete(anim.start, now, anim.duration) {
            let to = anim.to;
            self.animation = None;
            Some(to)
        } else {
            let t = progress(anim.start, now, anim.duration);
            Some(lerp(anim.from, anim.to, anim.easing.apply(t)))
        }
    }

    /// Cancel any active animation and stop at the current position
    pub fn cancel(&mut self) {
        if self.animation.take().is_some() {
            debug!("scroll animation cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OffsetSpec;

    fn animated_config() -> GlideConfig {
        GlideConfig {
            animation_duration_ms: 100,
            hop_offset: OffsetSpec::px(250.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_instant_when_animation_disabled() {
        let config = GlideConfig {
            animation_duration_ms: 0,
            ..Default::default()
        };
        let mut animator = ScrollAnimator::new();

        let shown = animator.start(0.0, 1850.0, false, &config, 1000.0, Instant::now());
        assert_eq!(shown, 1850.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_animation_starts_without_moving() {
        let config = animated_config();
        let mut animator = ScrollAnimator::new();

        let shown = animator.start(100.0, 1850.0, false, &config, 1000.0, Instant::now());
        assert_eq!(shown, 100.0);
        assert!(animator.is_animating());
        assert_eq!(animator.target_offset(), Some(1850.0));
    }

    #[test]
    fn test_hop_repositions_when_far() {
        let config = animated_config();
        let mut animator = ScrollAnimator::new();

        // |delta| = 1850 > 250: hop to final - hop_px
        let shown = animator.start(0.0, 1850.0, true, &config, 1000.0, Instant::now());
        assert_eq!(shown, 1600.0);
        assert!(animator.is_animating());
        assert_eq!(animator.target_offset(), Some(1850.0));
    }

    #[test]
    fn test_hop_repositions_upward() {
        let config = animated_config();
        let mut animator = ScrollAnimator::new();

        let shown = animator.start(1850.0, 0.0, true, &config, 1000.0, Instant::now());
        assert_eq!(shown, 250.0);
    }

    #[test]
    fn test_no_hop_within_hop_offset() {
        let config = animated_config();
        let mut animator = ScrollAnimator::new();

        // |delta| = 200 <= 250: no instantaneous jump
        let shown = animator.start(0.0, 200.0, true, &config, 1000.0, Instant::now());
        assert_eq!(shown, 0.0);
        assert!(animator.is_animating());
    }

    #[test]
    fn test_hop_offset_resolves_percent() {
        let config = GlideConfig {
            animation_duration_ms: 100,
            hop_offset: OffsetSpec::percent(25.0),
            ..Default::default()
        };
        let mut animator = ScrollAnimator::new();

        // 25% of 1000 = 250px
        let shown = animator.start(0.0, 1850.0, true, &config, 1000.0, Instant::now());
        assert_eq!(shown, 1600.0);
    }

    #[test]
    fn test_already_at_target() {
        let config = animated_config();
        let mut animator = ScrollAnimator::new();

        let shown = animator.start(500.0, 500.0, false, &config, 1000.0, Instant::now());
        assert_eq!(shown, 500.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_new_start_preempts() {
        let config = animated_config();
        let mut animator = ScrollAnimator::new();
        let t0 = Instant::now();

        animator.start(0.0, 1000.0, false, &config, 1000.0, t0);
        animator.start(0.0, 300.0, false, &config, 1000.0, t0);

        // Exactly one animation, targeting the new destination
        assert!(animator.is_animating());
        assert_eq!(animator.target_offset(), Some(300.0));
    }

    #[test]
    fn test_update_interpolates_and_completes() {
        let config = GlideConfig {
            animation_duration_ms: 100,
            easing: EasingType::Linear,
            ..Default::default()
        };
        let mut animator = ScrollAnimator::new();
        let t0 = Instant::now();

        animator.start(0.0, 100.0, false, &config, 1000.0, t0);

        let mid = animator.update(t0 + Duration::from_millis(50)).unwrap();
        assert!((mid - 50.0).abs() < 0.001);
        assert!(animator.is_animating());

        let end = animator.update(t0 + Duration::from_millis(100)).unwrap();
        assert_eq!(end, 100.0);
        assert!(!animator.is_animating());
        assert_eq!(animator.update(t0 + Duration::from_millis(150)), None);
    }

    #[test]
    fn test_cancel_stops_animation() {
        let config = animated_config();
        let mut animator = ScrollAnimator::new();
        let t0 = Instant::now();

        animator.start(0.0, 1000.0, false, &config, 1000.0, t0);
        animator.cancel();

        assert!(!animator.is_animating());
        assert_eq!(animator.update(t0 + Duration::from_millis(50)), None);
    }
}
