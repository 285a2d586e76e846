pub mod run_benchmarks;

pub use run_benchmarks::*;
