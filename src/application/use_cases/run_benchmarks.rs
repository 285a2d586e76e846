use std::cell::Cell;
use std::rc::Rc;

use crate::application::catalog::{SetDescriptor, bind_suite};
use crate::application::config::BenchConfig;
use crate::application::frame_rate::SessionRefreshRate;
use crate::domain::benchmark::{DrawingSurface, FrameSource, ImageSource, ProgressReporter, SuiteReport};
use crate::domain::errors::{BenchError, BenchResult};
use crate::domain::logging::{LogComponent, get_logger};

/// Prepare the catalog against a surface and run it end to end.
pub struct RunBenchmarksUseCase<S, L, F> {
    surface: Rc<S>,
    images: L,
    frames: F,
    config: BenchConfig,
}

impl<S, L, F> RunBenchmarksUseCase<S, L, F>
where
    S: DrawingSurface + 'static,
    S::Path: 'static,
    S::Image: 'static,
    L: ImageSource<Image = S::Image>,
    F: FrameSource,
{
    pub fn new(surface: Rc<S>, images: L, frames: F, config: BenchConfig) -> Self {
        Self { surface, images, frames, config }
    }

    pub async fn execute<R>(
        &self,
        descriptors: &[SetDescriptor],
        session: &SessionRefreshRate,
        reporter: &mut R,
    ) -> BenchResult<SuiteReport>
    where
        R: ProgressReporter + ?Sized,
    {
        let (width, height) = self.surface.dimensions();
        get_logger().info(
            LogComponent::Application("RunBenchmarks"),
            &format!("preparing {} sets on a {}x{} surface", descriptors.len(), width, height),
        );

        let suite = match bind_suite(descriptors, Rc::clone(&self.surface), &self.images).await {
            Ok(suite) => suite,
            Err(e) => {
                get_logger().error(
                    LogComponent::Application("RunBenchmarks"),
                    &format!("suite preparation failed: {e}"),
                );
                return Err(e);
            }
        };

        suite.run_all(&self.frames, session, &self.config, reporter).await
    }
}

/// Single-run gate shared by every entry point of a page.
///
/// Runs draw on one canvas and write one status line, so at most one may be
/// in flight at a time.
#[derive(Debug, Clone, Default)]
pub struct RunLock {
    busy: Rc<Cell<bool>>,
}

impl RunLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.busy.get()
    }

    /// Fails with [`BenchError::RunInProgress`] while another permit is alive.
    pub fn try_acquire(&self) -> BenchResult<RunPermit> {
        if self.busy.replace(true) {
            return Err(BenchError::RunInProgress);
        }
        Ok(RunPermit { busy: Rc::clone(&self.busy) })
    }
}

/// Releases the [`RunLock`] when dropped, including on early error returns.
#[derive(Debug)]
pub struct RunPermit {
    busy: Rc<Cell<bool>>,
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.busy.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_run_is_rejected_while_first_is_in_flight() {
        let lock = RunLock::new();
        let permit = lock.try_acquire().unwrap();
        assert!(lock.is_running());
        assert_eq!(lock.clone().try_acquire().unwrap_err(), BenchError::RunInProgress);
        drop(permit);
        assert!(!lock.is_running());
        assert!(lock.try_acquire().is_ok());
    }
}
