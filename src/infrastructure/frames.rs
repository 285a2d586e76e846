use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use gloo::render::request_animation_frame;
use gloo_timers::future::TimeoutFuture;
use web_sys::Performance;

use crate::domain::benchmark::FrameSource;
use crate::domain::errors::{BenchError, BenchResult};

/// Frame source backed by `requestAnimationFrame` and `performance.now()`.
pub struct AnimationFrameSource {
    performance: Performance,
}

impl AnimationFrameSource {
    pub fn new() -> BenchResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| BenchError::BrowserApi("Window not available".to_string()))?;
        let performance = window
            .performance()
            .ok_or_else(|| BenchError::BrowserApi("performance not available".to_string()))?;
        Ok(Self { performance })
    }
}

impl FrameSource for AnimationFrameSource {
    fn now(&self) -> f64 {
        self.performance.now()
    }

    fn next_frame(&self) -> LocalBoxFuture<'_, f64> {
        let (tx, rx) = oneshot::channel();
        // Dropping the handle cancels the request, so it travels with the future.
        let handle = request_animation_frame(move |timestamp| {
            let _ = tx.send(timestamp);
        });
        async move {
            let timestamp = rx.await.unwrap_or_else(|_| self.now());
            drop(handle);
            timestamp
        }
        .boxed_local()
    }

    fn sleep(&self, ms: u32) -> LocalBoxFuture<'_, ()> {
        TimeoutFuture::new(ms).boxed_local()
    }
}
