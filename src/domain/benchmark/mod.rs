//! Benchmark aggregate: workloads, result cells, budgets and the ports the
//! harness depends on.

pub mod entities;
pub mod ports;
pub mod value_objects;

pub use entities::*;
pub use ports::*;
pub use value_objects::*;
