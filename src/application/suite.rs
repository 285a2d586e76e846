use super::config::BenchConfig;
use super::frame_rate::{FrameRateDetector, SessionRefreshRate};
use super::harness::BenchmarkHarness;
use crate::domain::benchmark::{FrameSource, ProgressReporter, SuiteReport, WorkloadSet};
use crate::domain::errors::BenchResult;
use crate::domain::logging::LogComponent;
use crate::log_info;

const COMPONENT: LogComponent = LogComponent::Application("Suite");

/// Ordered workload sets run strictly one after another.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkSuite {
    sets: Vec<WorkloadSet>,
}

impl BenchmarkSuite {
    pub fn new(sets: Vec<WorkloadSet>) -> Self {
        Self { sets }
    }

    pub fn sets(&self) -> &[WorkloadSet] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Run every set in order.
    ///
    /// Progress is reported before each set starts. The refresh rate is taken
    /// from `session`, detecting it on first use. Between two sets the runner
    /// sleeps for `config.settle_delay_ms` to let GC and thermal effects of
    /// the previous set fade.
    pub async fn run_all<F, R>(
        &self,
        source: F,
        session: &SessionRefreshRate,
        config: &BenchConfig,
        reporter: &mut R,
    ) -> BenchResult<SuiteReport>
    where
        F: FrameSource,
        R: ProgressReporter + ?Sized,
    {
        let total = self.sets.len();
        let detector = FrameRateDetector::new(config.detection_window_ms);
        let mut harness: Option<BenchmarkHarness<&F>> = None;
        let mut reports = Vec::with_capacity(total);

        for (index, set) in self.sets.iter().enumerate() {
            if index > 0 {
                source.sleep(config.settle_delay_ms).await;
            }
            reporter.suite_progress(index + 1, total, set.title());
            log_info!(COMPONENT, "Running: {}/{}. {}", index + 1, total, set.title());

            if harness.is_none() {
                let rate = session.get_or_detect(&detector, &source).await;
                harness = Some(BenchmarkHarness::with_iterations(
                    &source,
                    config.frame_budget(rate),
                    config.iterations_per_sample,
                ));
            }
            if let Some(harness) = &harness {
                reports.push(harness.run_workload_set(set, &mut *reporter).await?);
            }
        }

        reporter.suite_finished();
        log_info!(COMPONENT, "All test done. {} sets", total);

        let rate = session.get().map(|r| r.fps()).unwrap_or_default();
        let budget = config.frame_budget(rate.into());
        Ok(SuiteReport {
            fps: rate,
            drop_limit_ms: budget.drop_limit_ms,
            timeout_ms: budget.timeout_ms,
            sets: reports,
        })
    }
}
