//! Browser adapters for the benchmark ports.

pub mod frames;
pub mod rendering;
pub mod services;
pub mod ui;

pub use frames::AnimationFrameSource;
pub use rendering::{BrowserImageLoader, CanvasSurface};
pub use services::{BrowserTimeProvider, ConsoleLogger};
pub use ui::DomReporter;
