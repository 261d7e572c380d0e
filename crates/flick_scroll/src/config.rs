//! Configuration for scroll behavior

use serde::{Deserialize, Serialize};

use flick_animation::{Easing, TrackerTimings};
use flick_core::{Axis, Error, Result};

/// Which axes a view scrolls on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrollDirection {
    /// Both axes
    #[default]
    Both,
    /// X only
    Horizontal,
    /// Y only
    Vertical,
}

impl ScrollDirection {
    /// Whether this direction includes `axis`
    pub fn handles(self, axis: Axis) -> bool {
        match (self, axis) {
            (ScrollDirection::Both, _) => true,
            (ScrollDirection::Horizontal, Axis::Horizontal) => true,
            (ScrollDirection::Vertical, Axis::Vertical) => true,
            _ => false,
        }
    }
}

/// How a computed offset is applied to the visual element
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrollMethod {
    /// 2D translation transform
    #[default]
    Translate,
    /// Absolute positioning
    Position,
    /// The element's native scroll offset
    Native,
}

/// Configuration for a [`ScrollView`](crate::view::ScrollView)
///
/// The duration/threshold defaults and the resistance/paging ratios are the
/// empirically tuned values; they are fields rather than constants because
/// they are tuning knobs, not contracts.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animation tick rate
    pub fps: u32,
    /// Scrollable axes
    pub direction: ScrollDirection,
    /// Momentum deceleration duration (ms)
    pub scroll_duration_ms: f32,
    /// Past-the-edge excursion duration (ms)
    pub overshoot_duration_ms: f32,
    /// Spring-back duration (ms)
    pub snapback_duration_ms: f32,
    /// Minimum pointer travel (px) before a gesture counts as a drag
    pub move_threshold: f32,
    /// A release more than this long (ms) after the last move has no velocity
    pub move_interval_threshold_ms: f32,
    /// Rendering strategy, fixed for the life of the view
    pub scroll_method: ScrollMethod,
    /// Whether the surface should show scroll indicators during motion
    pub show_scroll_bars: bool,
    /// Snap to whole viewport pages on release
    pub paging_enabled: bool,
    /// Allow travel past the edge with elastic snapback
    pub overshoot_enabled: bool,
    /// Deceleration curve
    pub easing: Easing,
    /// Fraction of pointer movement applied while out of bounds
    pub drag_resistance: f32,
    /// Fraction of a page the drag must cover to flip pages
    pub page_flip_ratio: f32,
    /// Dominance factor one axis needs over the other to win the
    /// direction lock
    pub direction_lock_ratio: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            direction: ScrollDirection::Both,
            scroll_duration_ms: 2000.0,
            overshoot_duration_ms: 250.0,
            snapback_duration_ms: 500.0,
            move_threshold: 10.0,
            move_interval_threshold_ms: 150.0,
            scroll_method: ScrollMethod::Translate,
            show_scroll_bars: true,
            paging_enabled: false,
            overshoot_enabled: false,
            easing: Easing::OutQuad,
            drag_resistance: 0.5,
            page_flip_ratio: 0.45,
            direction_lock_ratio: 2.0,
        }
    }
}

impl ScrollConfig {
    /// X-only view
    pub fn horizontal() -> Self {
        Self {
            direction: ScrollDirection::Horizontal,
            ..Default::default()
        }
    }

    /// Y-only view
    pub fn vertical() -> Self {
        Self {
            direction: ScrollDirection::Vertical,
            ..Default::default()
        }
    }

    /// Page-snapping view
    pub fn paged() -> Self {
        Self {
            paging_enabled: true,
            ..Default::default()
        }
    }

    /// View with elastic edges
    pub fn elastic() -> Self {
        Self {
            overshoot_enabled: true,
            ..Default::default()
        }
    }

    /// Interval between animation ticks
    pub fn tick_interval_ms(&self) -> f32 {
        1000.0 / self.fps.max(1) as f32
    }

    /// Timing configuration handed to each axis tracker
    pub fn tracker_timings(&self) -> TrackerTimings {
        TrackerTimings {
            overshoot_ms: self.overshoot_duration_ms,
            snapback_ms: self.snapback_duration_ms,
            easing: self.easing,
        }
    }

    /// Reject configurations the controller cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(Error::InvalidConfig("fps must be nonzero".into()));
        }
        if !self.drag_resistance.is_finite() || self.drag_resistance <= 0.0 {
            return Err(Error::InvalidConfig(
                "drag_resistance must be a positive fraction".into(),
            ));
        }
        if self.direction_lock_ratio < 1.0 {
            return Err(Error::InvalidConfig(
                "direction_lock_ratio must be at least 1.0".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for a [`CircularView`](crate::circular::CircularView)
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CircularConfig {
    /// Animation tick rate
    pub fps: u32,
    /// Momentum deceleration duration (ms)
    pub scroll_duration_ms: f32,
    /// Minimum pointer travel (px) before a gesture counts as a drag
    pub move_threshold: f32,
    /// A release more than this long (ms) after the last move has no velocity
    pub move_interval_threshold_ms: f32,
    /// Duration of a programmatic centering animation (ms)
    pub center_duration_ms: f32,
    /// Deceleration curve
    pub easing: Easing,
}

impl Default for CircularConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            scroll_duration_ms: 2000.0,
            move_threshold: 10.0,
            move_interval_threshold_ms: 150.0,
            center_duration_ms: 330.0,
            easing: Easing::OutQuad,
        }
    }
}

impl CircularConfig {
    /// Interval between animation ticks
    pub fn tick_interval_ms(&self) -> f32 {
        1000.0 / self.fps.max(1) as f32
    }

    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(Error::InvalidConfig("fps must be nonzero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_handles() {
        assert!(ScrollDirection::Both.handles(Axis::Horizontal));
        assert!(ScrollDirection::Both.handles(Axis::Vertical));
        assert!(ScrollDirection::Horizontal.handles(Axis::Horizontal));
        assert!(!ScrollDirection::Horizontal.handles(Axis::Vertical));
        assert!(!ScrollDirection::Vertical.handles(Axis::Horizontal));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ScrollConfig::default().validate().is_ok());
        assert!(CircularConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_fps_rejected() {
        let config = ScrollConfig {
            fps: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tick_interval() {
        let config = ScrollConfig::default();
        assert!((config.tick_interval_ms() - 1000.0 / 60.0).abs() < 1e-4);
    }
}
