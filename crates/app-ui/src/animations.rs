//! Animations
//!
//! Animations are described by an [`AnimationSpec`] and sampled as a pure
//! function of elapsed time, so a renderer can ask for the value of any
//! frame without owning a timer. [`Animation`] pairs a spec with a start
//! instant.

use std::time::{Duration, Instant};

use crate::tokens::{duration, easing};

/// Easing curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// Constant speed
    Linear,
    /// Slow start, full speed at the end
    Ease,
    /// Arbitrary cubic-bezier curve `(x1, y1, x2, y2)`
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Control points of the curve
    pub fn control_points(self) -> (f64, f64, f64, f64) {
        match self {
            Easing::Linear => easing::LINEAR,
            Easing::Ease => easing::EASE,
            Easing::CubicBezier(x1, y1, x2, y2) => (x1, y1, x2, y2),
        }
    }

    /// Map linear progress `t` in `[0, 1]` to eased progress
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self {
            Easing::Linear => t,
            other => {
                let (x1, y1, x2, y2) = other.control_points();
                cubic_bezier(x1, y1, x2, y2, t)
            }
        }
    }
}

fn bezier_coefficients(p1: f64, p2: f64) -> (f64, f64, f64) {
    let c = 3.0 * p1;
    let b = 3.0 * (p2 - p1) - c;
    let a = 1.0 - c - b;
    (a, b, c)
}

fn bezier_sample(p1: f64, p2: f64, s: f64) -> f64 {
    let (a, b, c) = bezier_coefficients(p1, p2);
    ((a * s + b) * s + c) * s
}

fn bezier_slope(p1: f64, p2: f64, s: f64) -> f64 {
    let (a, b, c) = bezier_coefficients(p1, p2);
    (3.0 * a * s + 2.0 * b) * s + c
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    const EPSILON: f64 = 1e-7;

    // Newton-Raphson first, bisection if the slope flattens out
    let mut s = t;
    for _ in 0..8 {
        let error = bezier_sample(x1, x2, s) - t;
        if error.abs() < EPSILON {
            return bezier_sample(y1, y2, s);
        }
        let slope = bezier_slope(x1, x2, s);
        if slope.abs() < EPSILON {
            break;
        }
        s -= error / slope;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = t;
    for _ in 0..64 {
        let x = bezier_sample(x1, x2, s);
        if (x - t).abs() < EPSILON {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    bezier_sample(y1, y2, s)
}

/// Duration, curve and value range of an animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    /// Total duration
    pub duration: Duration,
    /// Easing curve
    pub easing: Easing,
    /// Value at the start
    pub from: f64,
    /// Value at the end
    pub to: f64,
}

impl AnimationSpec {
    /// Animate from 0 to 1
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            from: 0.0,
            to: 1.0,
        }
    }

    /// Change the value range
    pub fn range(mut self, from: f64, to: f64) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Linear progress after `elapsed`, clamped to `[0, 1]`
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Animated value after `elapsed`
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        let eased = self.easing.apply(self.progress(elapsed));
        self.from + (self.to - self.from) * eased
    }

    /// Whether the animation has reached its end value
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

/// Fade in over the default 100ms
pub fn fade_in() -> AnimationSpec {
    fade_in_for(Duration::from_millis(duration::FAST))
}

/// Fade in over a custom duration
pub fn fade_in_for(duration: Duration) -> AnimationSpec {
    AnimationSpec::new(duration, Easing::Ease)
}

/// Reveal of a list row
pub fn item_animation() -> AnimationSpec {
    AnimationSpec::new(Duration::from_millis(duration::FAST), Easing::Linear)
}

/// A spec bound to a start instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    spec: AnimationSpec,
    started_at: Option<Instant>,
}

impl Animation {
    /// Create an animation that has not started
    pub fn new(spec: AnimationSpec) -> Self {
        Self {
            spec,
            started_at: None,
        }
    }

    /// Get the animation spec
    pub fn spec(&self) -> &AnimationSpec {
        &self.spec
    }

    /// Start now
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Start at a given instant
    pub fn start_at(&mut self, at: Instant) {
        self.started_at = Some(at);
    }

    /// Whether the animation was started
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Value at `now`; the start value until started
    pub fn value(&self, now: Instant) -> f64 {
        match self.started_at {
            Some(start) => self.spec.value_at(now.saturating_duration_since(start)),
            None => self.spec.from,
        }
    }
}

/// Opacity and scale reveal of the details screen button
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonReveal {
    opacity: Animation,
    scale: Animation,
}

impl ButtonReveal {
    /// Create a reveal that has not started
    pub fn new() -> Self {
        let spec = AnimationSpec::new(Duration::from_millis(duration::MODERATE), Easing::Ease);
        Self {
            opacity: Animation::new(spec),
            scale: Animation::new(spec),
        }
    }

    /// Start both animations now
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Start both animations at a given instant
    pub fn start_at(&mut self, at: Instant) {
        self.opacity.start_at(at);
        self.scale.start_at(at);
    }

    /// Whether the reveal was started
    pub fn is_started(&self) -> bool {
        self.opacity.is_started()
    }

    /// Opacity at `now`
    pub fn opacity(&self, now: Instant) -> f64 {
        self.opacity.value(now)
    }

    /// Scale at `now`
    pub fn scale(&self, now: Instant) -> f64 {
        self.scale.value(now)
    }
}

impl Default for ButtonReveal {
    fn default() -> Self {
        Self::new()
    }
}

/// Button reveal over 200ms
pub fn button_reveal() -> ButtonReveal {
    ButtonReveal::new()
}
