use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use strum::Display as StrumDisplay;

/// Raw frame counts strictly inside this band snap to [`RefreshRate::CANONICAL_FPS`].
pub const SNAP_BAND: (u32, u32) = (50, 70);

/// Label shown for cells that were never measured to completion.
pub const SKIPPED_LABEL: &str = "(skipped)";

/// Value Object - display refresh rate in frames per second
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Display, Serialize, Deserialize,
)]
#[display(fmt = "{}fps", _0)]
pub struct RefreshRate(u32);

impl RefreshRate {
    pub const CANONICAL_FPS: u32 = 60;

    /// Normalize a raw frame count sampled over one second.
    ///
    /// Displays near 60Hz jitter by a few frames per second; those samples
    /// are reported as exactly 60 so they do not read as dropped frames.
    /// Anything outside the band (30Hz, 120Hz, 144Hz...) is kept as sampled.
    pub fn from_sample(frame_count: u32) -> Self {
        let (lower, upper) = SNAP_BAND;
        if frame_count > lower && frame_count < upper {
            Self(Self::CANONICAL_FPS)
        } else {
            Self(frame_count)
        }
    }

    pub fn fps(&self) -> u32 {
        self.0
    }
}

/// Time budgets derived once per session from the refresh rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameBudget {
    pub drop_limit_ms: f64,
    pub timeout_ms: f64,
}

impl FrameBudget {
    pub const DEFAULT_ITERATIONS: u32 = 60;
    pub const DEFAULT_JITTER_TOLERANCE: f64 = 1.1;
    pub const DEFAULT_TIMEOUT_FACTOR: f64 = 4.0;

    /// `drop_limit = iterations / fps * 1000 * tolerance`, `timeout = drop_limit * factor`.
    ///
    /// A zero rate is treated as 1fps so the budget stays finite.
    pub fn new(rate: RefreshRate, iterations: u32, jitter_tolerance: f64, timeout_factor: f64) -> Self {
        let fps = rate.fps().max(1) as f64;
        let drop_limit_ms = (iterations as f64 / fps) * 1000.0 * jitter_tolerance;
        Self {
            drop_limit_ms,
            timeout_ms: drop_limit_ms * timeout_factor,
        }
    }

    pub fn for_rate(rate: RefreshRate) -> Self {
        Self::new(
            rate,
            Self::DEFAULT_ITERATIONS,
            Self::DEFAULT_JITTER_TOLERANCE,
            Self::DEFAULT_TIMEOUT_FACTOR,
        )
    }

    pub fn is_dropped(&self, elapsed_ms: f64) -> bool {
        elapsed_ms > self.drop_limit_ms
    }
}

/// Classification of a single result cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    Ok,
    Dropped,
    Skipped,
}

impl CellStatus {
    /// Skipped cells are rendered with the same warning style as dropped ones.
    pub fn is_flagged(&self) -> bool {
        !matches!(self, CellStatus::Ok)
    }
}

pub fn format_elapsed(elapsed_ms: f64) -> String {
    format!("{:.2}ms", elapsed_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_near_sixty() {
        assert_eq!(RefreshRate::from_sample(51).fps(), 60);
        assert_eq!(RefreshRate::from_sample(69).fps(), 60);
        assert_eq!(RefreshRate::from_sample(50).fps(), 50);
        assert_eq!(RefreshRate::from_sample(70).fps(), 70);
        assert_eq!(RefreshRate::from_sample(120).fps(), 120);
    }

    #[test]
    fn sixty_fps_budget() {
        let budget = FrameBudget::for_rate(RefreshRate::from(60));
        assert!((budget.drop_limit_ms - 1100.0).abs() < 1e-9);
        assert!((budget.timeout_ms - 4400.0).abs() < 1e-9);
        assert!(!budget.is_dropped(900.0));
        assert!(budget.is_dropped(1200.0));
    }

    #[test]
    fn zero_rate_budget_is_finite() {
        let budget = FrameBudget::for_rate(RefreshRate::from(0));
        assert!(budget.timeout_ms.is_finite());
    }

    #[test]
    fn status_names() {
        assert_eq!(CellStatus::Dropped.to_string(), "dropped");
        assert!(CellStatus::Skipped.is_flagged());
        assert!(!CellStatus::Ok.is_flagged());
        assert_eq!(format_elapsed(1234.5678), "1234.57ms");
    }
}
