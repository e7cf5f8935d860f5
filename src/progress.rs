//! Geometry and timing for the circular placement-score indicator.
//!
//! The arc is a stroked circle whose dash offset hides the unfilled part:
//! an offset equal to the circumference hides the whole arc, zero shows all
//! of it.

use std::f64::consts::PI;
use std::time::{Duration, Instant};

use serde::Serialize;

pub const INDICATOR_SIZE: f64 = 120.0;
pub const STROKE_WIDTH: f64 = 10.0;
pub const RADIUS: f64 = (INDICATOR_SIZE - STROKE_WIDTH) / 2.0;
pub const CIRCUMFERENCE: f64 = 2.0 * PI * RADIUS;

pub const REVEAL_DURATION: Duration = Duration::from_millis(800);

const SUCCESS_THRESHOLD: f64 = 70.0;
const CAUTION_THRESHOLD: f64 = 40.0;

// cubic-bezier(0, 0, 0.58, 1), the CSS `ease-out` curve
const EASE_OUT_X2: f64 = 0.58;
const EASE_OUT_Y2: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcColor {
    Success,
    Caution,
    Alert,
}

impl ArcColor {
    pub fn hex(self) -> &'static str {
        match self {
            ArcColor::Success => "#86EFAC",
            ArcColor::Caution => "#FDE68A",
            ArcColor::Alert => "#FCA5A5",
        }
    }

    /// 24-bit terminal foreground escape for the hex color.
    pub fn ansi(self) -> String {
        let hex = self.hex().trim_start_matches('#');
        let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).unwrap_or(0);
        format!("\x1b[38;2;{};{};{}m", channel(0), channel(2), channel(4))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArcGeometry {
    pub color: ArcColor,
    pub dash_offset: f64,
    pub circumference: f64,
    pub label: i64,
}

/// Lower bounds are inclusive: exactly 70 is success, exactly 40 is caution.
pub fn arc_color(percentage: f64) -> ArcColor {
    if percentage >= SUCCESS_THRESHOLD {
        ArcColor::Success
    } else if percentage >= CAUTION_THRESHOLD {
        ArcColor::Caution
    } else {
        ArcColor::Alert
    }
}

/// Out-of-range percentages are not clamped here; the offset formula stays
/// well defined and the caller decides how to display the result.
pub fn compute_arc(percentage: f64) -> ArcGeometry {
    ArcGeometry {
        color: arc_color(percentage),
        dash_offset: CIRCUMFERENCE - (percentage / 100.0) * CIRCUMFERENCE,
        circumference: CIRCUMFERENCE,
        label: percentage.round() as i64,
    }
}

/// Progress along the ease-out curve for linear time `t` in [0, 1].
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let (mut low, mut high) = (0.0_f64, 1.0_f64);
    let mut s = t;
    for _ in 0..48 {
        s = (low + high) / 2.0;
        if bezier(s, EASE_OUT_X2) < t {
            low = s;
        } else {
            high = s;
        }
    }
    bezier(s, EASE_OUT_Y2)
}

// first control point is pinned at (0, 0), the end point at (1, 1)
fn bezier(s: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * s * s * p2 + s * s * s
}

/// One reveal: from a fully hidden arc to the target offset.
#[derive(Debug, Clone, Copy)]
pub struct ArcAnimation {
    target: f64,
    started: Instant,
    duration: Duration,
}

impl ArcAnimation {
    pub fn start(target: f64, started: Instant) -> Self {
        Self {
            target,
            started,
            duration: REVEAL_DURATION,
        }
    }

    pub fn offset_at(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started);
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        CIRCUMFERENCE + (self.target - CIRCUMFERENCE) * ease_out(t)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

/// Holds the indicator's current value and restarts the reveal from a
/// hidden arc every time the value changes.
#[derive(Debug, Default)]
pub struct ProgressIndicator {
    percentage: Option<f64>,
    animation: Option<ArcAnimation>,
}

impl ProgressIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when a new reveal was started.
    pub fn set_percentage(&mut self, percentage: f64, now: Instant) -> bool {
        if self.percentage == Some(percentage) {
            return false;
        }
        self.percentage = Some(percentage);
        self.animation = Some(ArcAnimation::start(
            compute_arc(percentage).dash_offset,
            now,
        ));
        true
    }

    pub fn geometry(&self) -> Option<ArcGeometry> {
        self.percentage.map(compute_arc)
    }

    pub fn offset_at(&self, now: Instant) -> f64 {
        self.animation
            .map(|animation| animation.offset_at(now))
            .unwrap_or(CIRCUMFERENCE)
    }

    pub fn is_settled(&self, now: Instant) -> bool {
        self.animation
            .map(|animation| animation.is_finished(now))
            .unwrap_or(true)
    }
}
