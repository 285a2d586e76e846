use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use super::value_objects::{CellStatus, SKIPPED_LABEL, format_elapsed};
use crate::domain::errors::{ValidationError, ValidationResult};

/// Callable drawing `count` primitives on each invocation.
type WorkloadFn = Rc<dyn Fn(u32)>;

/// Domain entity - a named unit of work parameterized by repetition count
#[derive(Clone)]
pub struct Workload {
    name: String,
    run: WorkloadFn,
}

impl Workload {
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(u32) + 'static,
    {
        Self { name: name.into(), run: Rc::new(run) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self, repetitions: u32) {
        (self.run)(repetitions)
    }
}

impl fmt::Debug for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workload").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Domain entity - workloads measured against a shared repetition-count axis
#[derive(Debug, Clone)]
pub struct WorkloadSet {
    title: String,
    unit_label: String,
    repetition_counts: Vec<u32>,
    workloads: Vec<Workload>,
}

impl WorkloadSet {
    /// Counts must be non-empty and strictly increasing: the early-exit rule
    /// skips every count after a timeout, which is only sound when later
    /// counts cost more.
    pub fn new(
        title: impl Into<String>,
        unit_label: impl Into<String>,
        repetition_counts: Vec<u32>,
    ) -> ValidationResult<Self> {
        let title = title.into();
        if repetition_counts.is_empty() {
            return Err(ValidationError::EmptyRepetitionCounts { set: title });
        }
        if let Some(pair) = repetition_counts.windows(2).find(|pair| pair[1] <= pair[0]) {
            return Err(ValidationError::NonIncreasingRepetitionCounts {
                set: title,
                previous: pair[0],
                next: pair[1],
            });
        }
        Ok(Self {
            title,
            unit_label: unit_label.into(),
            repetition_counts,
            workloads: Vec::new(),
        })
    }

    pub fn add_workload(&mut self, workload: Workload) -> ValidationResult<()> {
        if self.workloads.iter().any(|w| w.name() == workload.name()) {
            return Err(ValidationError::DuplicateWorkloadName {
                set: self.title.clone(),
                name: workload.name().to_string(),
            });
        }
        self.workloads.push(workload);
        Ok(())
    }

    pub fn with_workload<F>(mut self, name: impl Into<String>, run: F) -> ValidationResult<Self>
    where
        F: Fn(u32) + 'static,
    {
        self.add_workload(Workload::new(name, run))?;
        Ok(self)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn unit_label(&self) -> &str {
        &self.unit_label
    }

    pub fn repetition_counts(&self) -> &[u32] {
        &self.repetition_counts
    }

    pub fn workloads(&self) -> &[Workload] {
        &self.workloads
    }

    pub fn cell_count(&self) -> usize {
        self.workloads.len() * self.repetition_counts.len()
    }
}

/// Outcome of measuring one workload at one repetition count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SampleOutcome {
    Completed { elapsed_ms: f64, dropped: bool },
    /// Exceeded the timeout budget; later counts of the workload are skipped.
    TimedOut { elapsed_ms: f64 },
    Skipped,
}

impl SampleOutcome {
    pub fn status(&self) -> CellStatus {
        match self {
            SampleOutcome::Completed { dropped: false, .. } => CellStatus::Ok,
            SampleOutcome::Completed { dropped: true, .. } => CellStatus::Dropped,
            SampleOutcome::TimedOut { .. } | SampleOutcome::Skipped => CellStatus::Skipped,
        }
    }

    pub fn elapsed_ms(&self) -> Option<f64> {
        match self {
            SampleOutcome::Completed { elapsed_ms, .. } => Some(*elapsed_ms),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.status() == CellStatus::Skipped
    }

    pub fn label(&self) -> String {
        match self.elapsed_ms() {
            Some(ms) => format_elapsed(ms),
            None => SKIPPED_LABEL.to_string(),
        }
    }
}

/// One cell of a results table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellResult {
    pub workload: String,
    pub repetitions: u32,
    pub outcome: SampleOutcome,
}

impl CellResult {
    pub fn new(workload: impl Into<String>, repetitions: u32, outcome: SampleOutcome) -> Self {
        Self { workload: workload.into(), repetitions, outcome }
    }

    /// The "dropped" flag shown to the user. Skipped cells count as dropped.
    pub fn dropped(&self) -> bool {
        self.outcome.status().is_flagged()
    }

    pub fn view(&self) -> CellView {
        CellView {
            workload: self.workload.clone(),
            repetitions: self.repetitions,
            label: self.outcome.label(),
            status: self.outcome.status(),
            dropped: self.dropped(),
        }
    }
}

/// Display-ready projection of a cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub workload: String,
    pub repetitions: u32,
    pub label: String,
    pub status: CellStatus,
    pub dropped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadRow {
    pub workload: String,
    pub cells: Vec<CellResult>,
}

impl WorkloadRow {
    pub fn first_skipped_index(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.outcome.is_skipped())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetReport {
    pub title: String,
    pub unit_label: String,
    pub repetition_counts: Vec<u32>,
    pub rows: Vec<WorkloadRow>,
}

impl SetReport {
    pub fn cells(&self) -> impl Iterator<Item = &CellResult> {
        self.rows.iter().flat_map(|row| row.cells.iter())
    }

    pub fn cell_views(&self) -> Vec<CellView> {
        self.cells().map(CellResult::view).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    pub fps: u32,
    pub drop_limit_ms: f64,
    pub timeout_ms: f64,
    pub sets: Vec<SetReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn rejects_empty_counts() {
        let err = WorkloadSet::new("rects", "px", vec![]).unwrap_err();
        assert_eq!(err, ValidationError::EmptyRepetitionCounts { set: "rects".into() });
    }

    #[test]
    fn rejects_non_increasing_counts() {
        let err = WorkloadSet::new("rects", "px", vec![1000, 3000, 2000]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonIncreasingRepetitionCounts {
                set: "rects".into(),
                previous: 3000,
                next: 2000
            }
        );
        assert!(WorkloadSet::new("rects", "px", vec![5, 5]).is_err());
    }

    #[test]
    fn rejects_duplicate_names() {
        let set = WorkloadSet::new("rects", "px", vec![1])
            .unwrap()
            .with_workload("1x1", |_| {})
            .unwrap();
        assert!(set.with_workload("1x1", |_| {}).is_err());
    }

    #[test]
    fn workload_invokes_callable() {
        let seen = Rc::new(Cell::new(0));
        let sink = seen.clone();
        let workload = Workload::new("counter", move |n| sink.set(n));
        workload.invoke(42);
        assert_eq!(seen.get(), 42);
        assert_eq!(workload.name(), "counter");
    }

    #[test]
    fn outcome_labels_and_status() {
        let ok = SampleOutcome::Completed { elapsed_ms: 900.0, dropped: false };
        let slow = SampleOutcome::Completed { elapsed_ms: 1200.0, dropped: true };
        let timed_out = SampleOutcome::TimedOut { elapsed_ms: 4500.0 };
        assert_eq!(ok.label(), "900.00ms");
        assert_eq!(ok.status(), CellStatus::Ok);
        assert_eq!(slow.status(), CellStatus::Dropped);
        assert_eq!(timed_out.label(), SKIPPED_LABEL);
        assert!(timed_out.is_skipped());
        assert!(CellResult::new("x", 1, SampleOutcome::Skipped).dropped());
    }
}
