#![allow(dead_code)]

use canvas_bench_wasm::domain::benchmark::{
    CellResult, DrawingSurface, FrameSource, ImageSource, PreparedPath, ProgressReporter, SetReport,
    Workload, WorkloadSet,
};
use canvas_bench_wasm::domain::errors::BenchError;
use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Frame source driven by a shared, manually advanced clock.
pub struct ScriptedFrames {
    clock: Rc<Cell<f64>>,
    frame_ms: f64,
    frames: Cell<u32>,
    sleeps: RefCell<Vec<(f64, u32)>>,
}

impl ScriptedFrames {
    /// Every frame advances the clock by `frame_ms`.
    pub fn new(frame_ms: f64) -> Self {
        Self {
            clock: Rc::new(Cell::new(0.0)),
            frame_ms,
            frames: Cell::new(0),
            sleeps: RefCell::new(Vec::new()),
        }
    }

    /// Frames cost nothing; only workloads move the clock.
    pub fn instant() -> Self {
        Self::new(0.0)
    }

    pub fn clock(&self) -> Rc<Cell<f64>> {
        Rc::clone(&self.clock)
    }

    pub fn frames_delivered(&self) -> u32 {
        self.frames.get()
    }

    /// `(clock at start, duration)` of every sleep.
    pub fn sleeps(&self) -> Vec<(f64, u32)> {
        self.sleeps.borrow().clone()
    }
}

impl FrameSource for ScriptedFrames {
    fn now(&self) -> f64 {
        self.clock.get()
    }

    fn next_frame(&self) -> LocalBoxFuture<'_, f64> {
        self.clock.set(self.clock.get() + self.frame_ms);
        self.frames.set(self.frames.get() + 1);
        future::ready(self.clock.get()).boxed_local()
    }

    fn sleep(&self, ms: u32) -> LocalBoxFuture<'_, ()> {
        self.sleeps.borrow_mut().push((self.clock.get(), ms));
        self.clock.set(self.clock.get() + ms as f64);
        future::ready(()).boxed_local()
    }
}

/// Workload advancing `clock` by `cost(count)` per call and recording each call.
pub fn timed_workload(
    name: &str,
    clock: Rc<Cell<f64>>,
    calls: Rc<RefCell<Vec<u32>>>,
    cost: impl Fn(u32) -> f64 + 'static,
) -> Workload {
    Workload::new(name, move |count| {
        calls.borrow_mut().push(count);
        clock.set(clock.get() + cost(count));
    })
}

/// Workload whose every call costs `ms_per_call`, whatever the count.
pub fn flat_workload(name: &str, clock: Rc<Cell<f64>>, ms_per_call: f64) -> Workload {
    Workload::new(name, move |_| clock.set(clock.get() + ms_per_call))
}

pub fn set_with(title: &str, counts: Vec<u32>, workloads: Vec<Workload>) -> WorkloadSet {
    let mut set = WorkloadSet::new(title, "size(px)", counts).expect("valid set");
    for workload in workloads {
        set.add_workload(workload).expect("unique name");
    }
    set
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Progress { index: usize, total: usize, title: String, at: f64 },
    SetStarted { title: String, at: f64 },
    Cell(CellResult),
    SetFinished { title: String, at: f64 },
    SuiteFinished,
}

/// Reporter keeping every notification with the clock value it arrived at.
pub struct RecordingReporter {
    clock: Rc<Cell<f64>>,
    pub events: Vec<Event>,
}

impl RecordingReporter {
    pub fn new(clock: Rc<Cell<f64>>) -> Self {
        Self { clock, events: Vec::new() }
    }

    pub fn cells(&self) -> Vec<CellResult> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Cell(cell) => Some(cell.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn suite_progress(&mut self, index: usize, total: usize, title: &str) {
        self.events.push(Event::Progress { index, total, title: title.to_string(), at: self.clock.get() });
    }

    fn set_started(&mut self, set: &WorkloadSet) {
        self.events.push(Event::SetStarted { title: set.title().to_string(), at: self.clock.get() });
    }

    fn cell_completed(&mut self, cell: &CellResult) {
        self.events.push(Event::Cell(cell.clone()));
    }

    fn set_finished(&mut self, report: &SetReport) {
        self.events.push(Event::SetFinished { title: report.title.clone(), at: self.clock.get() });
    }

    fn suite_finished(&mut self) {
        self.events.push(Event::SuiteFinished);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Rects { size_px: f64, count: u32 },
    Circles { diameter_px: f64, count: u32 },
    Path { anchors: usize, size_px: f64, count: u32 },
    Text { font_px: u32, text: String, count: u32 },
    Image { source_px: u32, draw_px: f64, count: u32 },
}

pub struct FakePath {
    anchors: usize,
    size_px: f64,
}

impl PreparedPath for FakePath {
    fn anchor_count(&self) -> usize {
        self.anchors
    }
}

/// Surface recording every call instead of drawing.
#[derive(Default)]
pub struct RecordingSurface {
    pub calls: RefCell<Vec<DrawCall>>,
    pub prepared_paths: Cell<usize>,
}

impl DrawingSurface for RecordingSurface {
    type Image = u32;
    type Path = FakePath;

    fn dimensions(&self) -> (u32, u32) {
        (1920, 1080)
    }

    fn fill_rects(&self, size_px: f64, count: u32) {
        self.calls.borrow_mut().push(DrawCall::Rects { size_px, count });
    }

    fn fill_circles(&self, diameter_px: f64, count: u32) {
        self.calls.borrow_mut().push(DrawCall::Circles { diameter_px, count });
    }

    fn prepare_path(&self, anchors: usize, size_px: f64) -> Result<FakePath, BenchError> {
        self.prepared_paths.set(self.prepared_paths.get() + 1);
        Ok(FakePath { anchors, size_px })
    }

    fn fill_path(&self, path: &FakePath, count: u32) {
        self.calls.borrow_mut().push(DrawCall::Path {
            anchors: path.anchor_count(),
            size_px: path.size_px,
            count,
        });
    }

    fn draw_text(&self, font_px: u32, text: &str, count: u32) {
        self.calls.borrow_mut().push(DrawCall::Text { font_px, text: text.to_string(), count });
    }

    fn draw_images(&self, image: &u32, draw_px: f64, count: u32) {
        self.calls.borrow_mut().push(DrawCall::Image { source_px: *image, draw_px, count });
    }
}

/// "Loads" an image by returning its size; optionally fails like a browser
/// without an offscreen 2D context.
#[derive(Default)]
pub struct FakeImages {
    pub requested: RefCell<Vec<u32>>,
    pub fail: bool,
}

impl FakeImages {
    pub fn failing() -> Self {
        Self { requested: RefCell::new(Vec::new()), fail: true }
    }
}

impl ImageSource for FakeImages {
    type Image = u32;

    fn load_resized(&self, size_px: u32) -> LocalBoxFuture<'_, Result<u32, BenchError>> {
        self.requested.borrow_mut().push(size_px);
        let result = if self.fail {
            Err(BenchError::SurfaceUnavailable("no canvas context".to_string()))
        } else {
            Ok(size_px)
        };
        future::ready(result).boxed_local()
    }
}
