//! WASM entry points.

pub mod benchmark_api;

pub use benchmark_api::BenchmarkPage;
