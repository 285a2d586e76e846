use futures::future::LocalBoxFuture;

use super::entities::{CellResult, SetReport, WorkloadSet};
use crate::domain::errors::BenchError;

/// Scheduling capability the harness measures against.
///
/// Browser builds use `requestAnimationFrame`; tests drive a scripted clock.
pub trait FrameSource {
    /// Monotonic clock in milliseconds.
    fn now(&self) -> f64;

    /// Resolves once the host has scheduled the next frame, with its timestamp.
    fn next_frame(&self) -> LocalBoxFuture<'_, f64>;

    /// Resolves after roughly `ms` milliseconds.
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'_, ()>;
}

/// Path prepared once and filled many times.
pub trait PreparedPath {
    fn anchor_count(&self) -> usize;
}

/// Drawing primitives, each drawing `count` shapes at random positions.
pub trait DrawingSurface {
    type Image;
    type Path: PreparedPath;

    /// Pixel dimensions (width, height).
    fn dimensions(&self) -> (u32, u32);

    fn fill_rects(&self, size_px: f64, count: u32);

    fn fill_circles(&self, diameter_px: f64, count: u32);

    /// Build a closed path of `anchors` points fitting in a `size_px` square.
    fn prepare_path(&self, anchors: usize, size_px: f64) -> Result<Self::Path, BenchError>;

    fn fill_path(&self, path: &Self::Path, count: u32);

    fn draw_text(&self, font_px: u32, text: &str, count: u32);

    /// Blit the whole image into `draw_px` squares.
    fn draw_images(&self, image: &Self::Image, draw_px: f64, count: u32);
}

/// Produces images pre-resized to a square pixel size.
pub trait ImageSource {
    type Image;

    fn load_resized(&self, size_px: u32) -> LocalBoxFuture<'_, Result<Self::Image, BenchError>>;
}

/// Receives results as they become available.
pub trait ProgressReporter {
    /// Called before set `index` (1-based) of `total` starts.
    fn suite_progress(&mut self, index: usize, total: usize, title: &str);

    fn set_started(&mut self, set: &WorkloadSet);

    fn cell_completed(&mut self, cell: &CellResult);

    fn set_finished(&mut self, _report: &SetReport) {}

    fn suite_finished(&mut self);
}

/// Reporter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn suite_progress(&mut self, _index: usize, _total: usize, _title: &str) {}

    fn set_started(&mut self, _set: &WorkloadSet) {}

    fn cell_completed(&mut self, _cell: &CellResult) {}

    fn suite_finished(&mut self) {}
}

impl<T: FrameSource + ?Sized> FrameSource for &T {
    fn now(&self) -> f64 {
        (**self).now()
    }

    fn next_frame(&self) -> LocalBoxFuture<'_, f64> {
        (**self).next_frame()
    }

    fn sleep(&self, ms: u32) -> LocalBoxFuture<'_, ()> {
        (**self).sleep(ms)
    }
}

impl<T: FrameSource + ?Sized> FrameSource for std::rc::Rc<T> {
    fn now(&self) -> f64 {
        (**self).now()
    }

    fn next_frame(&self) -> LocalBoxFuture<'_, f64> {
        (**self).next_frame()
    }

    fn sleep(&self, ms: u32) -> LocalBoxFuture<'_, ()> {
        (**self).sleep(ms)
    }
}
