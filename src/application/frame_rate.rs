use once_cell::unsync::OnceCell;

use crate::domain::benchmark::{FrameSource, RefreshRate};
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_info};

const COMPONENT: LogComponent = LogComponent::Application("FrameRate");

/// Counts frame callbacks over a fixed wall-clock window.
#[derive(Debug, Clone, Copy)]
pub struct FrameRateDetector {
    window_ms: f64,
}

impl Default for FrameRateDetector {
    fn default() -> Self {
        Self { window_ms: 1000.0 }
    }
}

impl FrameRateDetector {
    pub fn new(window_ms: f64) -> Self {
        Self { window_ms }
    }

    /// Sample the refresh rate. The frame that crosses the window boundary is
    /// counted. Suspends forever if the host never delivers frames.
    pub async fn detect<F: FrameSource + ?Sized>(&self, source: &F) -> RefreshRate {
        let start = source.now();
        let mut count: u32 = 0;
        loop {
            source.next_frame().await;
            count += 1;
            if source.now() - start >= self.window_ms {
                break;
            }
        }
        // Scale to frames per second when the window is not one second.
        let per_second = (count as f64 * 1000.0 / self.window_ms).round() as u32;
        let rate = RefreshRate::from_sample(per_second);
        log_debug!(COMPONENT, "sampled {} frames in {}ms -> {}", count, self.window_ms, rate);
        rate
    }
}

/// Session-scoped refresh rate: detected at most once, then reused.
#[derive(Debug, Default)]
pub struct SessionRefreshRate {
    rate: OnceCell<RefreshRate>,
}

impl SessionRefreshRate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded session, for hosts that already know their refresh rate.
    pub fn known(rate: RefreshRate) -> Self {
        Self { rate: OnceCell::with_value(rate) }
    }

    pub fn get(&self) -> Option<RefreshRate> {
        self.rate.get().copied()
    }

    pub async fn get_or_detect<F: FrameSource + ?Sized>(
        &self,
        detector: &FrameRateDetector,
        source: &F,
    ) -> RefreshRate {
        if let Some(rate) = self.get() {
            return rate;
        }
        let detected = detector.detect(source).await;
        // First value wins if a concurrent caller filled the cell while we awaited.
        let rate = *self.rate.get_or_init(|| detected);
        log_info!(COMPONENT, "session refresh rate {}", rate);
        rate
    }
}
