use crate::domain::benchmark::{
    CellResult, FrameBudget, FrameSource, ProgressReporter, SampleOutcome, SetReport, Workload,
    WorkloadRow, WorkloadSet,
};
use crate::domain::errors::{BenchError, BenchResult};
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_info, log_warn};

const COMPONENT: LogComponent = LogComponent::Application("Harness");

/// Measures workloads frame by frame against a fixed budget.
///
/// Each sample runs the workload once per frame for `iterations` frames, so
/// the elapsed time includes the paint cycle and not only the cost of issuing
/// draw calls.
pub struct BenchmarkHarness<F: FrameSource> {
    source: F,
    budget: FrameBudget,
    iterations: u32,
}

impl<F: FrameSource> BenchmarkHarness<F> {
    pub fn new(source: F, budget: FrameBudget) -> Self {
        Self::with_iterations(source, budget, FrameBudget::DEFAULT_ITERATIONS)
    }

    pub fn with_iterations(source: F, budget: FrameBudget, iterations: u32) -> Self {
        Self { source, budget, iterations: iterations.max(1) }
    }

    /// Run `workload` once per frame and return the total elapsed time.
    ///
    /// Fails with [`BenchError::Timeout`] as soon as the elapsed time passes
    /// `timeout_ms` with frames still left to run. The final frame is never
    /// checked against the timeout.
    pub async fn run_workload(
        &self,
        workload: &Workload,
        repetitions: u32,
        timeout_ms: f64,
    ) -> BenchResult<f64> {
        let start = self.source.now();
        let mut elapsed_ms = 0.0;
        for remaining in (0..self.iterations).rev() {
            self.source.next_frame().await;
            workload.invoke(repetitions);
            elapsed_ms = self.source.now() - start;
            if remaining > 0 && elapsed_ms > timeout_ms {
                return Err(BenchError::Timeout { elapsed_ms, limit_ms: timeout_ms });
            }
        }
        Ok(elapsed_ms)
    }

    /// Measure and classify one cell against the session budget.
    pub async fn measure(&self, workload: &Workload, repetitions: u32) -> BenchResult<SampleOutcome> {
        match self.run_workload(workload, repetitions, self.budget.timeout_ms).await {
            Ok(elapsed_ms) => Ok(SampleOutcome::Completed {
                elapsed_ms,
                dropped: self.budget.is_dropped(elapsed_ms),
            }),
            Err(BenchError::Timeout { elapsed_ms, .. }) => Ok(SampleOutcome::TimedOut { elapsed_ms }),
            Err(other) => Err(other),
        }
    }

    /// Run every workload of `set` across its repetition counts, in order.
    ///
    /// Cells are handed to `reporter` as they complete. After a workload times
    /// out, its remaining counts are reported as skipped without running.
    pub async fn run_workload_set<R>(&self, set: &WorkloadSet, reporter: &mut R) -> BenchResult<SetReport>
    where
        R: ProgressReporter + ?Sized,
    {
        log_info!(
            COMPONENT,
            "running '{}' ({} workloads x {} counts)",
            set.title(),
            set.workloads().len(),
            set.repetition_counts().len()
        );
        reporter.set_started(set);

        let mut rows = Vec::with_capacity(set.workloads().len());
        for workload in set.workloads() {
            let mut cells = Vec::with_capacity(set.repetition_counts().len());
            let mut timed_out = false;
            for &repetitions in set.repetition_counts() {
                let outcome = if timed_out {
                    SampleOutcome::Skipped
                } else {
                    self.measure(workload, repetitions).await?
                };

                match outcome {
                    SampleOutcome::TimedOut { elapsed_ms } => {
                        log_warn!(
                            COMPONENT,
                            "{} @ {}: timeout after {:.2}ms, skipping larger counts",
                            workload.name(),
                            repetitions,
                            elapsed_ms
                        );
                        timed_out = true;
                    }
                    SampleOutcome::Completed { elapsed_ms, dropped } => {
                        log_debug!(
                            COMPONENT,
                            "{} @ {}: {:.2}ms{}",
                            workload.name(),
                            repetitions,
                            elapsed_ms,
                            if dropped { " (dropped)" } else { "" }
                        );
                    }
                    SampleOutcome::Skipped => {}
                }

                let cell = CellResult::new(workload.name(), repetitions, outcome);
                reporter.cell_completed(&cell);
                cells.push(cell);
            }
            rows.push(WorkloadRow { workload: workload.name().to_string(), cells });
        }

        let report = SetReport {
            title: set.title().to_string(),
            unit_label: set.unit_label().to_string(),
            repetition_counts: set.repetition_counts().to_vec(),
            rows,
        };
        reporter.set_finished(&report);
        Ok(report)
    }
}
