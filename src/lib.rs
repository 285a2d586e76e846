use wasm_bindgen::prelude::*;

use crate::domain::logging::{LogComponent, get_logger};

pub mod domain;
pub mod infrastructure;
pub mod application;
pub mod presentation;

pub use application::{BenchConfig, BenchmarkHarness, BenchmarkSuite, FrameRateDetector, SessionRefreshRate};
pub use domain::benchmark::{FrameBudget, FrameSource, RefreshRate, Workload, WorkloadSet};
pub use domain::errors::{BenchError, ValidationError};

/// Install panic hook, console logger and browser clock.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let console_logger = if cfg!(debug_assertions) {
        infrastructure::ConsoleLogger::new_development()
    } else {
        infrastructure::ConsoleLogger::new_production()
    };
    domain::logging::init_logger(Box::new(console_logger));
    domain::logging::init_time_provider(Box::new(infrastructure::BrowserTimeProvider::new()));

    get_logger().info(
        LogComponent::Presentation("Initialize"),
        "canvas benchmark module loaded",
    );
}
