//! Design tokens for Barfly
//!
//! Motion values shared by the bar screens.

// =============================================================================
// Animation Tokens
// =============================================================================

/// Animation duration tokens (in milliseconds)
pub mod duration {
    /// Fast (100ms)
    pub const FAST: u64 = 100;
    /// Moderate (200ms)
    pub const MODERATE: u64 = 200;
}

/// Easing curves as cubic-bezier control points `(x1, y1, x2, y2)`
pub mod easing {
    /// Linear
    pub const LINEAR: (f64, f64, f64, f64) = (0.0, 0.0, 1.0, 1.0);
    /// Ease (slow start)
    pub const EASE: (f64, f64, f64, f64) = (0.42, 0.0, 1.0, 1.0);
}
