pub mod catalog;
pub mod config;
pub mod frame_rate;
pub mod harness;
pub mod suite;
pub mod use_cases;

pub use catalog::*;
pub use config::*;
pub use frame_rate::*;
pub use harness::*;
pub use suite::*;
pub use use_cases::*;
